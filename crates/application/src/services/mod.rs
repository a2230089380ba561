pub mod admission;
pub mod query_normalizer;

pub use admission::{AllowAllPolicy, NameAllowListPolicy, PolicyChain, SubnetPolicy};
pub use query_normalizer::{normalize_name, QueryNormalizer};
