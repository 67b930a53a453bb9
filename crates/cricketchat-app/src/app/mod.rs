pub mod commands;
pub mod repl;
pub mod setup;

pub use repl::run_repl_mode;
pub use setup::{setup_from_cli, setup_from_config, AppContext, LOGIN_REQUIRED};
