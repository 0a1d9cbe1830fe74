//! Record store connection arguments.

use crate::store::postgrest::DEFAULT_TABLE;
use anyhow::{Context, Result, bail};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

pub const ARG_STORE_URL: &str = "store-url";
pub const ARG_STORE_API_KEY: &str = "store-api-key";
pub const ARG_STORE_TABLE: &str = "store-table";
pub const ARG_STORE_TIMEOUT: &str = "store-timeout";

#[derive(Debug)]
pub struct Options {
    pub url: Url,
    pub api_key: SecretString,
    pub table: String,
    pub timeout: Option<Duration>,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing or the URL is not
    /// an absolute http(s) URL.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let raw_url = matches
            .get_one::<String>(ARG_STORE_URL)
            .context("missing required argument: --store-url")?;
        let url = Url::parse(raw_url).with_context(|| format!("invalid --{ARG_STORE_URL}"))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            bail!("--{ARG_STORE_URL} must be an http(s) URL, got {url}");
        }

        let api_key = matches
            .get_one::<String>(ARG_STORE_API_KEY)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --store-api-key")?;

        let table = matches
            .get_one::<String>(ARG_STORE_TABLE)
            .cloned()
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let timeout = match matches.get_one::<u64>(ARG_STORE_TIMEOUT).copied() {
            Some(0) => None,
            Some(seconds) => Some(Duration::from_secs(seconds)),
            None => Some(Duration::from_secs(10)),
        };

        Ok(Self {
            url,
            api_key,
            table,
            timeout,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_STORE_URL)
                .long(ARG_STORE_URL)
                .help("Record store project URL, example: https://<project>.supabase.co")
                .env("DASHBOARD_STORE_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_STORE_API_KEY)
                .long(ARG_STORE_API_KEY)
                .help("Record store API key, sent as `apikey` and bearer token")
                .env("DASHBOARD_STORE_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_STORE_TABLE)
                .long(ARG_STORE_TABLE)
                .help("Collection holding the sender / geburtsdatum records")
                .env("DASHBOARD_STORE_TABLE")
                .default_value(DEFAULT_TABLE),
        )
        .arg(
            Arg::new(ARG_STORE_TIMEOUT)
                .long(ARG_STORE_TIMEOUT)
                .help("Lookup timeout in seconds, 0 disables it")
                .env("DASHBOARD_STORE_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
}
