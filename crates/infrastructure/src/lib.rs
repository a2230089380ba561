//! linkrelay infrastructure: DNS wire mapping, transports and OS integration.
pub mod dns;
pub mod system;
