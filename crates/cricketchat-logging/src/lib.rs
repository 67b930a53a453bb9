// Logging module - log bootstrap, chat transcripts, and shared directories
pub mod transcript;

use std::path::PathBuf;

use anyhow::{Context, Result};

pub use transcript::TranscriptLogger;

/// Install the process-wide logger.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` for the
/// cricketchat crates and `warn` for everything else.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,cricketchat=debug,cricketchat_api=debug,cricketchat_chat=debug,cricketchat_store=debug"
    } else {
        "warn"
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
}

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Get or create the base cricketchat directory (~/.cricketchat)
/// This holds the local store and the transcript logs
pub fn get_cricketchat_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let dir = PathBuf::from(home_dir).join(".cricketchat");
    std::fs::create_dir_all(&dir).context("Failed to create cricketchat directory")?;
    Ok(dir)
}

/// Get or create the logs directory under `base`
pub fn get_logs_dir(base: &std::path::Path) -> Result<PathBuf> {
    let logs_dir = base.join("logs");
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;
    Ok(logs_dir)
}
