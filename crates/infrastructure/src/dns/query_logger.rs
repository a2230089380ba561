use linkrelay_application::ports::QueryObserver;
use linkrelay_domain::CanonicalQuery;
use tracing::info;

/// Reports admission decisions through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingQueryObserver;

impl QueryObserver for TracingQueryObserver {
    fn query_accepted(&self, query: &CanonicalQuery) {
        info!(
            name = %query.name,
            kind = %query.kind,
            peer = %query.peer,
            "Answered query with relay address"
        );
    }

    fn query_ignored(&self, query: &CanonicalQuery) {
        info!(
            name = %query.name,
            kind = %query.kind,
            peer = %query.peer,
            "Ignored query rejected by admission policy"
        );
    }
}
