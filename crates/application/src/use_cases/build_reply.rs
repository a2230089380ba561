use crate::ports::{AdmissionPolicy, QueryObserver};
use crate::services::QueryNormalizer;
use linkrelay_domain::netbios::encode_locator;
use linkrelay_domain::{
    AnswerData, AnswerRecord, CanonicalQuery, QueryKind, Question, RelayConfig, ReplyRecordSet,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds the answers for one request.
///
/// Every question is normalized, run through the admission policy and
/// answered with the relay addresses. Questions that cannot be decoded or
/// are rejected are skipped without affecting the rest of the request.
pub struct BuildReplyUseCase {
    relay: RelayConfig,
    policy: Arc<dyn AdmissionPolicy>,
    observer: Arc<dyn QueryObserver>,
}

impl BuildReplyUseCase {
    pub fn new(
        relay: RelayConfig,
        policy: Arc<dyn AdmissionPolicy>,
        observer: Arc<dyn QueryObserver>,
    ) -> Self {
        Self {
            relay,
            policy,
            observer,
        }
    }

    /// Returns `None` when no question produced an answer; the caller must
    /// then send nothing at all.
    ///
    /// `query_accepted` fires only for questions that added a record, so an
    /// admitted question with no matching relay address reports no event.
    pub fn execute(
        &self,
        questions: &[Question],
        peer: SocketAddr,
        local: SocketAddr,
    ) -> Option<ReplyRecordSet> {
        let mut reply = ReplyRecordSet::new();

        for question in questions {
            let query = match QueryNormalizer::normalize(question, peer.ip()) {
                Ok(query) => query,
                Err(e) => {
                    warn!(error = %e, name = %question.name, peer = %peer, "Skipping malformed question");
                    continue;
                }
            };

            if !self
                .policy
                .should_respond(&query.name, &query.kind, query.peer)
            {
                self.observer.query_ignored(&query);
                continue;
            }

            let answered_before = reply.len();
            self.append_answers(question, &query, &mut reply, local);

            if reply.len() > answered_before {
                self.observer.query_accepted(&query);
            }
        }

        if reply.is_empty() {
            return None;
        }

        Some(reply)
    }

    fn append_answers(
        &self,
        question: &Question,
        query: &CanonicalQuery,
        reply: &mut ReplyRecordSet,
        local: SocketAddr,
    ) {
        let ttl = self.relay.ttl_secs();
        let owner = &question.name;

        match query.kind {
            QueryKind::A => match self.relay.relay_ipv4 {
                Some(addr) => {
                    reply.push(AnswerRecord::new(owner.clone(), ttl, AnswerData::A(addr)))
                }
                None => {
                    info!(name = %query.name, "Ignored A request because no IPv4 relay gateway is configured")
                }
            },
            QueryKind::AAAA => match self.relay.relay_ipv6 {
                Some(addr) => {
                    reply.push(AnswerRecord::new(owner.clone(), ttl, AnswerData::AAAA(addr)))
                }
                None => {
                    info!(name = %query.name, "Ignored AAAA request because no IPv6 relay gateway is configured")
                }
            },
            QueryKind::Any => {
                if let Some(addr) = self.relay.relay_ipv4 {
                    reply.push(AnswerRecord::new(owner.clone(), ttl, AnswerData::A(addr)));
                }
                if let Some(addr) = self.relay.relay_ipv6 {
                    reply.push(AnswerRecord::new(owner.clone(), ttl, AnswerData::AAAA(addr)));
                }
            }
            QueryKind::NetBios { .. } => {
                reply.clear_checking_disabled = true;
                reply.echo_question = false;

                match self.relay.relay_ipv4 {
                    Some(addr) => reply.push(AnswerRecord::new(
                        owner.clone(),
                        ttl,
                        AnswerData::NetBiosLocator(encode_locator(addr)),
                    )),
                    None => {
                        info!(name = %query.name, "Ignored NetBIOS request because no IPv4 relay gateway is configured")
                    }
                }
            }
            QueryKind::Unhandled(qtype) => {
                debug!(
                    qtype,
                    kind = %query.kind,
                    name = %query.name,
                    peer = %query.peer,
                    local = %local,
                    "Unhandled query type"
                );
            }
        }
    }
}
