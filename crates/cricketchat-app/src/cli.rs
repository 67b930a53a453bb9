use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cricketchat_types::DEFAULT_API_URL;

/// CLI arguments for cricketchat
#[derive(Parser, Debug)]
#[command(name = "cricketchat")]
#[command(about = "Cricket Stats Chat - ask questions about cricket statistics in plain English")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the cricket stats API
    #[arg(long, value_name = "URL", env = "CRICKET_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Directory holding the local store and transcripts (default: ~/.cricketchat)
    #[arg(long, value_name = "PATH", env = "CRICKETCHAT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Number of entries fetched when the history panel opens
    #[arg(long, value_name = "N", env = "CRICKETCHAT_HISTORY_LIMIT", default_value_t = 20, global = true)]
    pub history_limit: usize,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", env = "CRICKETCHAT_TIMEOUT_SECS", default_value_t = 60, global = true)]
    pub timeout_secs: u64,

    /// Chat without logging in; the conversation is scoped to this process only
    #[arg(long, global = true)]
    pub anonymous: bool,

    /// Append every turn to a JSONL transcript under <data-dir>/logs
    #[arg(long, global = true)]
    pub transcript: bool,

    /// Enable verbose debug output (shows HTTP requests, session events, etc.)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Show recent questions and answers stored on the server
    History {
        /// Maximum number of entries (defaults to --history-limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Erase the conversation on the server and locally
    ClearMemory,
    /// Log in and store the session
    Login {
        #[arg(long, env = "CRICKET_EMAIL")]
        email: Option<String>,
        #[arg(long, env = "CRICKET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account and store the session
    Signup {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who the session runs as
    Whoami,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_chat() {
        let cli = Cli::try_parse_from(["cricketchat"]).unwrap();
        assert_eq!(cli.command(), Commands::Chat);
        assert_eq!(cli.history_limit, 20);
        assert_eq!(cli.timeout_secs, 60);
        assert!(!cli.anonymous);
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["cricketchat", "--anonymous", "ask", "most", "runs?"]).unwrap();
        assert!(cli.anonymous);
        assert_eq!(
            cli.command(),
            Commands::Ask {
                question: vec!["most".into(), "runs?".into()]
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cricketchat", "history", "-n", "5", "--api-url", "http://stats:9000"]).unwrap();
        assert_eq!(cli.command(), Commands::History { limit: Some(5) });
        assert_eq!(cli.api_url, "http://stats:9000");
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["cricketchat", "ask"]).is_err());
    }
}
