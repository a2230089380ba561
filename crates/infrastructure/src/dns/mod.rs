pub mod message_mapper;
pub mod query_logger;
pub mod responder;
pub mod server;
pub mod transport;

pub use message_mapper::MessageMapper;
pub use query_logger::TracingQueryObserver;
pub use responder::{run_dns_responder, run_handler_on_packet_conn, DnsResponder};
pub use server::RelayHandler;
