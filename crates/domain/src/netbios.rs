//! NetBIOS first-level name encoding (RFC 1001 §14.1, RFC 1002 §4.1).
//!
//! A NetBIOS name is 16 bytes: a hostname padded with spaces to 15 bytes
//! followed by a one-byte service suffix. First-level encoding splits every
//! byte into two nibbles and maps each nibble `n` to the character `'A' + n`,
//! which turns the 16 bytes into a 32-character label that fits into a
//! regular DNS name.

use crate::DomainError;
use std::borrow::Cow;
use std::fmt;
use std::net::Ipv4Addr;

/// Number of raw bytes in a NetBIOS name (hostname + suffix).
pub const NETBIOS_NAME_LEN: usize = 16;

/// Number of characters in a first-level encoded NetBIOS name.
pub const ENCODED_NAME_LEN: usize = NETBIOS_NAME_LEN * 2;

/// Maximum hostname length; the 16th byte is reserved for the suffix.
pub const MAX_HOSTNAME_LEN: usize = NETBIOS_NAME_LEN - 1;

const PADDING: u8 = b' ';
const ALPHABET_START: u8 = b'A';
const ALPHABET_END: u8 = b'P';

/// NB_FLAGS for a unique name owned by a B-node (G = 0, ONT = 00).
const NB_FLAGS_UNIQUE_B_NODE: u16 = 0x0000;

/// Encodes 16 raw bytes into their 32-character first-level form.
pub fn encode_first_level(raw: &[u8; NETBIOS_NAME_LEN]) -> String {
    let mut encoded = String::with_capacity(ENCODED_NAME_LEN);
    for byte in raw {
        encoded.push((ALPHABET_START + (byte >> 4)) as char);
        encoded.push((ALPHABET_START + (byte & 0x0f)) as char);
    }
    encoded
}

/// Decodes a 32-character first-level label back into its 16 raw bytes.
pub fn decode_first_level(label: &str) -> Result<[u8; NETBIOS_NAME_LEN], DomainError> {
    let bytes = label.as_bytes();
    if bytes.len() != ENCODED_NAME_LEN {
        return Err(DomainError::MalformedNetBiosName(format!(
            "expected {} characters, got {}",
            ENCODED_NAME_LEN,
            bytes.len()
        )));
    }

    let mut raw = [0u8; NETBIOS_NAME_LEN];
    for (i, pair) in bytes.chunks_exact(2).enumerate() {
        let high = nibble(pair[0], label)?;
        let low = nibble(pair[1], label)?;
        raw[i] = (high << 4) | low;
    }
    Ok(raw)
}

fn nibble(c: u8, label: &str) -> Result<u8, DomainError> {
    if (ALPHABET_START..=ALPHABET_END).contains(&c) {
        Ok(c - ALPHABET_START)
    } else {
        Err(DomainError::MalformedNetBiosName(format!(
            "invalid character {:?} in {:?}",
            c as char, label
        )))
    }
}

/// A decoded NetBIOS name.
///
/// The hostname is kept as raw bytes, at most [`MAX_HOSTNAME_LEN`] of them,
/// since names on the wire are not required to be UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetBiosName {
    host: Vec<u8>,
    suffix: u8,
}

impl NetBiosName {
    pub fn new(hostname: impl Into<String>, suffix: u8) -> Result<Self, DomainError> {
        let hostname = hostname.into();
        if hostname.len() > MAX_HOSTNAME_LEN {
            return Err(DomainError::InvalidHostname(format!(
                "{:?} is longer than {} bytes",
                hostname, MAX_HOSTNAME_LEN
            )));
        }
        Ok(Self {
            host: hostname.into_bytes(),
            suffix,
        })
    }

    /// Decodes a first-level encoded label. Trailing padding is trimmed from
    /// the hostname.
    pub fn decode(label: &str) -> Result<Self, DomainError> {
        let raw = decode_first_level(label)?;
        let (host, suffix) = raw.split_at(MAX_HOSTNAME_LEN);
        let trimmed_len = host
            .iter()
            .rposition(|&b| b != PADDING)
            .map_or(0, |pos| pos + 1);

        Ok(Self {
            host: host[..trimmed_len].to_vec(),
            suffix: suffix[0],
        })
    }

    pub fn encode(&self) -> String {
        let mut raw = [PADDING; NETBIOS_NAME_LEN];
        raw[..self.host.len()].copy_from_slice(&self.host);
        raw[MAX_HOSTNAME_LEN] = self.suffix;
        encode_first_level(&raw)
    }

    /// Hostname for display and policy checks; invalid UTF-8 is replaced.
    pub fn hostname(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.host)
    }

    pub fn host_bytes(&self) -> &[u8] {
        &self.host
    }

    pub fn suffix(&self) -> u8 {
        self.suffix
    }

    pub fn service_label(&self) -> Cow<'static, str> {
        suffix_label(self.suffix)
    }
}

impl fmt::Display for NetBiosName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{:02X}>", self.hostname(), self.suffix)
    }
}

/// Human-readable service type of a NetBIOS suffix byte. Only used for logs.
pub fn suffix_label(suffix: u8) -> Cow<'static, str> {
    let label = match suffix {
        0x00 => "Workstation",
        0x01 => "Messenger",
        0x03 => "Messenger Service",
        0x06 => "RAS Server",
        0x1B => "Domain Master Browser",
        0x1C => "Domain Controllers",
        0x1D => "Master Browser",
        0x1E => "Browser Service Elections",
        0x1F => "NetDDE Service",
        0x20 => "File Server",
        0x21 => "RAS Client",
        0x22 => "Exchange Interchange",
        0x23 => "Exchange Store",
        0x24 => "Exchange Directory",
        0x30 => "Modem Sharing Server",
        0x31 => "Modem Sharing Client",
        0x43 => "SMS Client Remote Control",
        0x44 => "SMS Admin Remote Control Tool",
        0x45 => "SMS Client Remote Chat",
        0x46 => "SMS Client Remote Transfer",
        0x6A => "Exchange IMC",
        0x87 => "Exchange MTA",
        0xBE => "Network Monitor Agent",
        0xBF => "Network Monitor Application",
        other => return Cow::Owned(format!("{:#04x}", other)),
    };
    Cow::Borrowed(label)
}

/// Service label of an encoded name, straight from the wire label.
pub fn decode_suffix_label(label: &str) -> Result<Cow<'static, str>, DomainError> {
    let raw = decode_first_level(label)?;
    Ok(suffix_label(raw[MAX_HOSTNAME_LEN]))
}

/// RDATA of a positive name query response (RFC 1002 §4.2.13) announcing a
/// single unique B-node name owned by `addr`: NB_FLAGS followed by NB_ADDRESS.
pub fn encode_locator(addr: Ipv4Addr) -> Vec<u8> {
    let mut rdata = Vec::with_capacity(6);
    rdata.extend_from_slice(&NB_FLAGS_UNIQUE_B_NODE.to_be_bytes());
    rdata.extend_from_slice(&addr.octets());
    rdata
}
