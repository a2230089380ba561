use crate::netbios::suffix_label;
use std::borrow::Cow;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

pub const TYPE_A: u16 = 1;
pub const TYPE_AAAA: u16 = 28;
pub const TYPE_ANY: u16 = 255;

/// NetBIOS name service records use type 32 (NB). DNS assigns the same code
/// to NIMLOC, which nobody sends anymore, so every type 32 question is
/// treated as a NetBIOS lookup.
pub const TYPE_NETBIOS: u16 = 32;

/// A single question as it appeared on the wire.
///
/// `name` is the presentation form of the question name including the
/// trailing root separator, so replies can echo it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: Arc<str>,
    pub qtype: u16,
}

impl Question {
    pub fn new(name: impl Into<Arc<str>>, qtype: u16) -> Self {
        Self {
            name: name.into(),
            qtype,
        }
    }

    pub fn is_netbios(&self) -> bool {
        self.qtype == TYPE_NETBIOS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    A,
    AAAA,
    Any,
    NetBios { suffix: u8 },
    Unhandled(u16),
}

impl QueryKind {
    /// Maps a plain DNS type code. NetBIOS questions need their name decoded
    /// first and are built by the normalizer instead.
    pub fn from_qtype(qtype: u16) -> Self {
        match qtype {
            TYPE_A => QueryKind::A,
            TYPE_AAAA => QueryKind::AAAA,
            TYPE_ANY => QueryKind::Any,
            other => QueryKind::Unhandled(other),
        }
    }

    pub fn label(&self) -> Cow<'static, str> {
        match self {
            QueryKind::A => Cow::Borrowed("A"),
            QueryKind::AAAA => Cow::Borrowed("AAAA"),
            QueryKind::Any => Cow::Borrowed("ANY"),
            QueryKind::NetBios { suffix } => suffix_label(*suffix),
            QueryKind::Unhandled(code) => type_mnemonic(*code),
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn type_mnemonic(code: u16) -> Cow<'static, str> {
    let name = match code {
        2 => "NS",
        5 => "CNAME",
        6 => "SOA",
        12 => "PTR",
        15 => "MX",
        16 => "TXT",
        33 => "SRV",
        64 => "SVCB",
        65 => "HTTPS",
        other => return Cow::Owned(format!("TYPE{}", other)),
    };
    Cow::Borrowed(name)
}

/// Protocol-independent view of one incoming question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalQuery {
    /// Name without the trailing separator (or the decoded NetBIOS hostname).
    pub name: Arc<str>,
    pub kind: QueryKind,
    pub peer: IpAddr,
}

impl CanonicalQuery {
    pub fn new(name: impl Into<Arc<str>>, kind: QueryKind, peer: IpAddr) -> Self {
        Self {
            name: name.into(),
            kind,
            peer,
        }
    }
}
