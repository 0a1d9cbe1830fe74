use crate::cli::{
    actions::{Action, server::Args},
    commands::{self, store},
};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);

    let assets_dir = matches
        .get_one::<String>(commands::ARG_ASSETS_DIR)
        .map(PathBuf::from)
        .context("missing required argument: --assets-dir")?;

    let store = store::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        assets_dir,
        store,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn builds_server_action() -> Result<()> {
        temp_env::with_vars(
            [
                ("DASHBOARD_PORT", None::<&str>),
                ("DASHBOARD_ASSETS_DIR", None),
                ("DASHBOARD_STORE_TABLE", None),
                ("DASHBOARD_STORE_TIMEOUT", None),
                ("DASHBOARD_LOG_LEVEL", None),
                ("DASHBOARD_STORE_URL", Some("https://project.supabase.co")),
                ("DASHBOARD_STORE_API_KEY", Some("anon-key")),
            ],
            || {
                let matches = commands::new().try_get_matches_from([
                    "integrations-dashboard",
                    "--port",
                    "9090",
                    "--assets-dir",
                    "public",
                ])?;

                let Action::Server(args) = handler(&matches)?;
                assert_eq!(args.port, 9090);
                assert_eq!(args.assets_dir, PathBuf::from("public"));
                assert_eq!(args.store.url.host_str(), Some("project.supabase.co"));
                assert_eq!(args.store.api_key.expose_secret(), "anon-key");
                Ok(())
            },
        )
    }

    #[test]
    fn rejects_invalid_store_url() -> Result<()> {
        temp_env::with_vars(
            [
                ("DASHBOARD_STORE_URL", Some("ftp://project.supabase.co")),
                ("DASHBOARD_STORE_API_KEY", Some("anon-key")),
            ],
            || {
                let matches = commands::new().try_get_matches_from(["integrations-dashboard"])?;
                assert!(handler(&matches).is_err());
                Ok(())
            },
        )
    }
}
