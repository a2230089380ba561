//! Listener sockets built with `socket2` so options can be set before bind.

use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use tokio::net::{TcpListener, UdpSocket};

pub const LLMNR_PORT: u16 = 5355;
pub const LLMNR_GROUP: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 1, 3);
pub const MDNS_PORT: u16 = 5353;
pub const MDNS_GROUP: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 0xfb);
pub const NETBIOS_NS_PORT: u16 = 137;

fn domain_for(addr: &SocketAddr) -> Domain {
    if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    }
}

/// Must be called from within a tokio runtime.
pub fn create_udp_socket(addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = Socket::new(domain_for(&addr), Type::DGRAM, Some(Protocol::UDP))?;
    if addr.is_ipv6() && addr.ip().is_unspecified() {
        socket.set_only_v6(false)?;
    }
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;

    UdpSocket::from_std(socket.into())
}

/// Must be called from within a tokio runtime.
pub fn create_tcp_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = Socket::new(domain_for(&addr), Type::STREAM, Some(Protocol::TCP))?;
    if addr.is_ipv6() && addr.ip().is_unspecified() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;

    TcpListener::from_std(socket.into())
}

fn multicast_v6(group: Ipv6Addr, port: u16, interface_index: u32) -> io::Result<UdpSocket> {
    let addr = SocketAddr::V6(SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, port, 0, 0));
    let socket = Socket::new(Domain::IPV6, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_only_v6(true)?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.join_multicast_v6(&group, interface_index)?;
    socket.set_multicast_if_v6(interface_index)?;
    socket.set_multicast_loop_v6(false)?;
    socket.set_nonblocking(true)?;

    UdpSocket::from_std(socket.into())
}

/// LLMNR listener on `[::]:5355` joined to `ff02::1:3`.
pub fn bind_llmnr(interface_index: u32) -> io::Result<UdpSocket> {
    multicast_v6(LLMNR_GROUP, LLMNR_PORT, interface_index)
}

/// mDNS listener on `[::]:5353` joined to `ff02::fb`.
pub fn bind_mdns(interface_index: u32) -> io::Result<UdpSocket> {
    multicast_v6(MDNS_GROUP, MDNS_PORT, interface_index)
}

/// NetBIOS name service listener on `0.0.0.0:137`.
pub fn bind_netbios() -> io::Result<UdpSocket> {
    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, NETBIOS_NS_PORT));
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(true)?;
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;

    UdpSocket::from_std(socket.into())
}
