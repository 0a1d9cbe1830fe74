use crate::{
    api::{self, SharedStore},
    cli::{commands::store, telemetry},
    store::PostgrestStore,
};
use anyhow::{Context, Result};
use std::{fmt::Write as _, path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub assets_dir: PathBuf,
    pub store: store::Options,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the record store client cannot be built or the server
/// fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let record_store = PostgrestStore::new(
        &args.store.url,
        &args.store.table,
        args.store.api_key,
        args.store.timeout,
    )
    .context("Could not configure the record store")?;

    let shared: SharedStore = Arc::new(record_store);

    let result = api::new(args.port, shared, &args.assets_dir).await;

    telemetry::shutdown_tracer();

    result
}

fn log_startup_args(args: &Args) {
    let timeout = args
        .store
        .timeout
        .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));

    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("assets_dir", args.assets_dir.display().to_string()),
        ("store_url", args.store.url.to_string()),
        ("store_table", args.store.table.clone()),
        ("store_timeout", timeout),
    ];

    info!("{}", startup_message(&entries));
}

fn startup_message(entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ = write!(message, "\n  {key}:{padding} {value}");
    }
    message
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_commit_truncates() {
        assert_eq!(short_commit("0123456789abcdef"), "0123456");
        assert_eq!(short_commit(" abc "), "abc");
        assert_eq!(short_commit("unknown"), "unknown");
    }

    #[test]
    fn startup_message_aligns_keys() {
        let message = startup_message(&[
            ("listen", "tcp:8080".to_string()),
            ("store_table", "stammdaten".to_string()),
        ]);

        assert!(message.starts_with(env!("CARGO_PKG_NAME")));
        assert!(message.contains("\n  listen:      tcp:8080"));
        assert!(message.contains("\n  store_table: stammdaten"));
    }
}
