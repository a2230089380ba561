//! linkrelay domain layer
pub mod answer;
pub mod config;
pub mod errors;
pub mod netbios;
pub mod query;
pub mod relay;

pub use answer::{AnswerData, AnswerRecord, ReplyRecordSet};
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use netbios::NetBiosName;
pub use query::{CanonicalQuery, QueryKind, Question};
pub use relay::RelayConfig;
