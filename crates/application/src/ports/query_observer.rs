use linkrelay_domain::CanonicalQuery;

/// Receives one event per question that was answered or deliberately ignored.
pub trait QueryObserver: Send + Sync {
    fn query_accepted(&self, query: &CanonicalQuery);

    fn query_ignored(&self, query: &CanonicalQuery);
}
