use linkrelay_domain::{CanonicalQuery, DomainError, NetBiosName, QueryKind, Question};
use std::net::IpAddr;

/// Turns wire questions into [`CanonicalQuery`] values.
pub struct QueryNormalizer;

impl QueryNormalizer {
    pub fn normalize(question: &Question, peer: IpAddr) -> Result<CanonicalQuery, DomainError> {
        if question.is_netbios() {
            let name = NetBiosName::decode(netbios_label(&question.name))?;
            let kind = QueryKind::NetBios {
                suffix: name.suffix(),
            };
            return Ok(CanonicalQuery::new(name.hostname(), kind, peer));
        }

        let name = match normalize_name(&question.name) {
            "" => question.name.clone(),
            trimmed => trimmed.into(),
        };

        Ok(CanonicalQuery::new(
            name,
            QueryKind::from_qtype(question.qtype),
            peer,
        ))
    }
}

/// Strips surrounding whitespace and one trailing label separator.
pub fn normalize_name(name: &str) -> &str {
    let trimmed = name.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}

/// The encoded NetBIOS name is the first label; scope labels follow it.
fn netbios_label(name: &str) -> &str {
    let name = normalize_name(name);
    name.split_once('.').map_or(name, |(label, _scope)| label)
}
