mod admission_policy;
mod query_observer;

pub use admission_policy::AdmissionPolicy;
pub use query_observer::QueryObserver;
