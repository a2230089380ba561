//! linkrelay application layer: ports and the query → reply pipeline.
pub mod ports;
pub mod services;
pub mod use_cases;
