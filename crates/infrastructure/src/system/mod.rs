pub mod interface;
pub mod sockets;

pub use interface::{interface_index, listen_address};
pub use sockets::{bind_llmnr, bind_mdns, bind_netbios, create_tcp_listener, create_udp_socket};
