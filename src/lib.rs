//! # Integrations Dashboard
//!
//! A single-page dashboard listing third-party fitness integrations, gated by a
//! phone number / date of birth lookup against a remote record store.
//!
//! ## Access Gate
//!
//! Visitors submit a phone number and a date of birth. The pair is validated
//! locally (E.164-like phone, birth date strictly in the past), the date is
//! normalized to its UTC `YYYY-MM-DD` form, and a single equality-filtered
//! lookup is issued against the `stammdaten` collection of a PostgREST
//! compatible store. Exactly one matching record admits the visitor.
//!
//! - **No sessions:** admission lives for the lifetime of one view. Nothing is
//!   persisted and no token is issued, so reloading the page shows the form again.
//! - **Generic failures:** "no such record", "more than one record" and
//!   "store unreachable" all surface as `No matching user found`. The precise
//!   cause is only logged.
//!
//! ## Integrations
//!
//! Once admitted, the dashboard renders a fixed catalogue of six integrations.
//! None of the card actions are wired to a backend.

pub mod api;
pub mod cli;
pub mod gate;
pub mod integrations;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with("integrations-dashboard/"));
        assert!(APP_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
