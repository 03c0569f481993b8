//! Lead-generation forms for the marketing site: a declarative field schema,
//! a pure validator, the multi-step wizard controller, an in-memory page
//! model and the JSON submission client.

pub mod config;
pub mod error;
pub mod forms;
pub mod telemetry;
