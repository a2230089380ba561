use linkrelay_domain::QueryKind;
use std::net::IpAddr;

/// Decides whether a query gets an answer at all.
///
/// Called exactly once per question, before any answer is built. Closures
/// with the same signature implement it.
pub trait AdmissionPolicy: Send + Sync {
    fn should_respond(&self, name: &str, kind: &QueryKind, peer: IpAddr) -> bool;
}

impl<F> AdmissionPolicy for F
where
    F: Fn(&str, &QueryKind, IpAddr) -> bool + Send + Sync,
{
    fn should_respond(&self, name: &str, kind: &QueryKind, peer: IpAddr) -> bool {
        self(name, kind, peer)
    }
}
