//! Command-line client for the cricket stats chat service.
//!
//! The binary in `main.rs` only parses arguments and dispatches; everything
//! it calls lives here so the commands can be tested against a mock server.

pub mod app;
pub mod cli;
pub mod config;
pub mod render;

pub use app::{setup_from_cli, setup_from_config, AppContext};
pub use cli::{Cli, Commands};
pub use config::{normalize_api_url, ClientConfig};
