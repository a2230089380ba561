mod helpers;

use helpers::{
    handler, handler_with_policy, netbios_query, query, RecordingWriter, ScriptedPacketConn,
    RELAY_V4, RELAY_V6,
};
use hickory_proto::op::MessageType;
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{RData, RecordType};
use linkrelay_application::services::AllowAllPolicy;
use linkrelay_domain::{QueryKind, RelayConfig};
use linkrelay_infrastructure::dns::MessageMapper;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

fn peer() -> SocketAddr {
    "192.0.2.5:40000".parse().unwrap()
}

#[tokio::test]
async fn test_answered_query_is_written_once() {
    let handler = handler();
    let mut writer = RecordingWriter::new(peer());

    handler
        .serve(&mut writer, &query(11, &[("gateway.internal.", RecordType::A)]))
        .await;

    assert!(!writer.closed);
    assert_eq!(writer.written.len(), 1);
    let reply = &writer.written[0];
    assert_eq!(reply.id(), 11);
    assert_eq!(reply.answers().len(), 1);
    assert_eq!(reply.answers()[0].data(), Some(&RData::A(A(RELAY_V4))));
}

#[tokio::test]
async fn test_any_query_yields_both_records() {
    let handler = handler();
    let mut writer = RecordingWriter::new(peer());

    handler
        .serve(&mut writer, &query(12, &[("printer.lan.", RecordType::ANY)]))
        .await;

    let reply = &writer.written[0];
    assert_eq!(reply.answers().len(), 2);
    assert_eq!(reply.answers()[1].data(), Some(&RData::AAAA(AAAA(RELAY_V6))));
}

#[tokio::test]
async fn test_unanswerable_query_closes_without_writing() {
    let handler = handler();
    let mut writer = RecordingWriter::new(peer());

    handler
        .serve(&mut writer, &query(13, &[("mail.example.", RecordType::MX)]))
        .await;

    assert!(writer.closed);
    assert!(writer.written.is_empty());
}

#[tokio::test]
async fn test_rejected_query_closes_without_writing() {
    let deny = |_: &str, _: &QueryKind, _: IpAddr| false;
    let handler = handler_with_policy(RelayConfig::new(Some(RELAY_V4), None), Arc::new(deny));
    let mut writer = RecordingWriter::new(peer());

    handler
        .serve(&mut writer, &query(14, &[("host.local.", RecordType::A)]))
        .await;

    assert!(writer.closed);
    assert!(writer.written.is_empty());
}

#[tokio::test]
async fn test_responses_are_not_answered() {
    let handler = handler();
    let mut message = query(15, &[("host.local.", RecordType::A)]);
    message.set_message_type(MessageType::Response);

    assert!(handler.create_reply(&message, peer(), peer()).is_none());
}

#[tokio::test]
async fn test_write_failure_is_absorbed() {
    let handler = handler();
    let mut writer = RecordingWriter::failing(peer());

    handler
        .serve(&mut writer, &query(16, &[("host.local.", RecordType::A)]))
        .await;

    assert!(!writer.closed);
    assert!(writer.written.is_empty());
}

#[tokio::test]
async fn test_netbios_reply_through_writer() {
    let handler = handler_with_policy(
        RelayConfig::new(Some(RELAY_V4), None),
        Arc::new(AllowAllPolicy),
    );
    let mut writer = RecordingWriter::new(peer());

    let request = netbios_query(17, "FILESRV", 0x20);
    assert_eq!(
        request.queries()[0].name().to_ascii(),
        "EGEJEMEFFDFCFGCACACACACACACACACA."
    );

    handler.serve(&mut writer, &request).await;

    assert_eq!(writer.written.len(), 1);
    let reply = &writer.written[0];
    assert!(reply.queries().is_empty());
    assert!(!reply.checking_disabled());
    assert_eq!(reply.answers()[0].record_type(), RecordType::Unknown(32));
}

#[tokio::test]
async fn test_netbios_wire_packet_keeps_label_case() {
    let handler = handler_with_policy(
        RelayConfig::new(Some(RELAY_V4), None),
        Arc::new(AllowAllPolicy),
    );
    let mut writer = RecordingWriter::new(peer());

    let label = b"EGEJEMEFFDFCFGCACACACACACACACACA";
    let mut packet = vec![0x1a, 0x2b, 0x01, 0x10, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    packet.push(label.len() as u8);
    packet.extend_from_slice(label);
    packet.extend_from_slice(&[0x00, 0x00, 0x20, 0x00, 0x01]);
    let request = MessageMapper::parse(&packet).unwrap();

    handler.serve(&mut writer, &request).await;

    assert_eq!(writer.written.len(), 1);
    let reply = &writer.written[0];
    assert_eq!(reply.id(), 0x1a2b);
    assert!(reply.queries().is_empty());
    assert!(!reply.checking_disabled());
    assert_eq!(reply.answers().len(), 1);
    assert_eq!(reply.answers()[0].record_type(), RecordType::Unknown(32));
}

#[tokio::test]
async fn test_packet_conn_strategy_writes_to_sender() {
    let handler = handler();
    let conn = ScriptedPacketConn::new(Vec::new());

    handler
        .serve_on_conn(&conn, &query(18, &[("host.local.", RecordType::AAAA)]), peer())
        .await;

    let sent = conn.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, peer());
    let reply = MessageMapper::parse(&sent[0].0).unwrap();
    assert_eq!(reply.id(), 18);
    assert_eq!(reply.answers()[0].data(), Some(&RData::AAAA(AAAA(RELAY_V6))));
}

#[tokio::test]
async fn test_packet_conn_strategy_drops_unanswerable() {
    let handler = handler();
    let conn = ScriptedPacketConn::new(Vec::new());

    handler
        .serve_on_conn(&conn, &query(19, &[("mail.example.", RecordType::MX)]), peer())
        .await;

    assert!(conn.sent().is_empty());
}
