use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed NetBIOS name: {0}")]
    MalformedNetBiosName(String),

    #[error("Invalid NetBIOS hostname: {0}")]
    InvalidHostname(String),

    #[error("Invalid CIDR format: {0}")]
    InvalidCidr(String),

    #[error("Invalid domain name: {0}")]
    InvalidName(String),

    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Failed to serialize DNS message: {0}")]
    SerializationFailed(String),

    #[error("Failed to write response: {0}")]
    WriteFailed(String),

    #[error("Network interface not found: {0}")]
    InterfaceNotFound(String),

    #[error("Failed to bind {addr}: {reason}")]
    BindFailed { addr: String, reason: String },

    #[error("Failed to accept connection: {0}")]
    AcceptFailed(String),

    #[error("Failed to receive datagram: {0}")]
    ReceiveFailed(String),

    #[error("Listener task failed: {0}")]
    TaskFailed(String),
}
