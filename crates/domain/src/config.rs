pub mod errors;
pub mod link_local;
pub mod logging;
pub mod policy;
pub mod relay;
pub mod root;
pub mod server;

pub use errors::ConfigError;
pub use link_local::LinkLocalConfig;
pub use logging::LoggingConfig;
pub use policy::PolicyConfig;
pub use relay::RelaySettings;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
