pub mod builders;
pub mod mock_transport;

#[allow(unused_imports)]
pub use builders::{handler, handler_with_policy, netbios_query, query, RELAY_V4, RELAY_V6};
#[allow(unused_imports)]
pub use mock_transport::{Incoming, RecordingWriter, ScriptedPacketConn};
