use crate::dns::message_mapper::MessageMapper;
use crate::dns::transport::{unspecified_addr, PacketConn, ResponseWriter};
use hickory_proto::op::{Message, MessageType, OpCode};
use linkrelay_application::use_cases::BuildReplyUseCase;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error};

/// Turns decoded requests into replies and delivers them.
///
/// A request that yields no answers gets no reply at all: on a stream
/// transport the connection is closed, on a datagram transport nothing is
/// sent.
pub struct RelayHandler {
    use_case: Arc<BuildReplyUseCase>,
}

impl RelayHandler {
    pub fn new(use_case: Arc<BuildReplyUseCase>) -> Self {
        Self { use_case }
    }

    pub fn create_reply(
        &self,
        request: &Message,
        peer: SocketAddr,
        local: SocketAddr,
    ) -> Option<Message> {
        if request.message_type() != MessageType::Query || request.op_code() != OpCode::Query {
            debug!(
                peer = %peer,
                message_type = ?request.message_type(),
                op_code = ?request.op_code(),
                "Ignoring message that is not a standard query"
            );
            return None;
        }

        let questions = MessageMapper::questions(request);
        let records = self.use_case.execute(&questions, peer, local)?;

        match MessageMapper::reply(request, &records) {
            Ok(reply) => Some(reply),
            Err(e) => {
                error!(error = %e, peer = %peer, "Failed to build reply");
                None
            }
        }
    }

    /// Responder-writer strategy.
    pub async fn serve<W>(&self, writer: &mut W, request: &Message)
    where
        W: ResponseWriter + ?Sized,
    {
        match self.create_reply(request, writer.remote_addr(), writer.local_addr()) {
            Some(reply) => {
                if let Err(e) = writer.write_msg(&reply).await {
                    error!(error = %e, peer = %writer.remote_addr(), "Failed to write reply");
                }
            }
            None => {
                if let Err(e) = writer.close().await {
                    debug!(error = %e, peer = %writer.remote_addr(), "Failed to close exchange");
                }
            }
        }
    }

    /// Raw-socket strategy: packs the reply and writes it to `peer`.
    pub async fn serve_on_conn<C>(&self, conn: &C, request: &Message, peer: SocketAddr)
    where
        C: PacketConn + ?Sized,
    {
        let local = conn.local_addr().unwrap_or_else(|_| unspecified_addr());
        let Some(reply) = self.create_reply(request, peer, local) else {
            return;
        };

        let bytes = match MessageMapper::serialize(&reply) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, peer = %peer, "Failed to pack reply");
                return;
            }
        };

        if let Err(e) = conn.write_to(&bytes, peer).await {
            error!(error = %e, peer = %peer, "Failed to write reply");
        }
    }
}
