pub mod cli;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod orchestrator;
pub mod pipeline;
pub mod session;
pub mod types;
