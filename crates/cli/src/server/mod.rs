pub mod dns;
pub mod link_local;

pub use dns::start_dns_server;
pub use link_local::start_link_local;
