#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use linkrelay_application::ports::AdmissionPolicy;
use linkrelay_application::services::AllowAllPolicy;
use linkrelay_application::use_cases::BuildReplyUseCase;
use linkrelay_domain::query::TYPE_NETBIOS;
use linkrelay_domain::{NetBiosName, RelayConfig};
use linkrelay_infrastructure::dns::{RelayHandler, TracingQueryObserver};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

pub const RELAY_V4: Ipv4Addr = Ipv4Addr::new(10, 0, 2, 2);
pub const RELAY_V6: Ipv6Addr = Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 2);

pub fn handler_with_policy(relay: RelayConfig, policy: Arc<dyn AdmissionPolicy>) -> Arc<RelayHandler> {
    let use_case = BuildReplyUseCase::new(relay, policy, Arc::new(TracingQueryObserver));
    Arc::new(RelayHandler::new(Arc::new(use_case)))
}

pub fn handler() -> Arc<RelayHandler> {
    handler_with_policy(
        RelayConfig::new(Some(RELAY_V4), Some(RELAY_V6)),
        Arc::new(AllowAllPolicy),
    )
}

pub fn query(id: u16, questions: &[(&str, RecordType)]) -> Message {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);

    for (name, qtype) in questions {
        message.add_query(Query::query(Name::from_ascii(name).unwrap(), *qtype));
    }
    message
}

pub fn netbios_query(id: u16, hostname: &str, suffix: u8) -> Message {
    let encoded = NetBiosName::new(hostname, suffix).unwrap().encode();
    let mut message = query(id, &[(&format!("{}.", encoded), RecordType::Unknown(TYPE_NETBIOS))]);
    message.set_recursion_desired(false).set_checking_disabled(true);
    message
}
