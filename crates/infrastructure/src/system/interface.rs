use linkrelay_domain::DomainError;
use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6};

/// Resolves a network interface name to its kernel index.
#[cfg(unix)]
pub fn interface_index(name: &str) -> Result<u32, DomainError> {
    let c_name = std::ffi::CString::new(name)
        .map_err(|_| DomainError::InterfaceNotFound(format!("{:?}", name)))?;

    let index = unsafe { libc::if_nametoindex(c_name.as_ptr()) };
    if index == 0 {
        return Err(DomainError::InterfaceNotFound(format!(
            "{}: {}",
            name,
            std::io::Error::last_os_error()
        )));
    }

    Ok(index)
}

#[cfg(not(unix))]
pub fn interface_index(name: &str) -> Result<u32, DomainError> {
    Err(DomainError::InterfaceNotFound(format!(
        "{}: interface lookup is not supported on this platform",
        name
    )))
}

/// `[local_ipv6%scope]:port`.
pub fn listen_address(local_ipv6: Ipv6Addr, scope_id: u32, port: u16) -> SocketAddr {
    SocketAddr::V6(SocketAddrV6::new(local_ipv6, port, 0, scope_id))
}
