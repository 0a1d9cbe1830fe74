//! Remote record lookup used by the access gate.

pub mod postgrest;

pub use self::postgrest::PostgrestStore;

use std::{future::Future, pin::Pin};
use thiserror::Error;

/// A matched row. The gate only cares that it exists.
pub type Record = serde_json::Value;

pub type LookupFuture<'a> = Pin<Box<dyn Future<Output = Result<Record, LookupError>> + Send + 'a>>;

/// Equality filters for a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKey {
    /// Phone number exactly as entered.
    pub sender: String,
    /// Birth date as `YYYY-MM-DD`.
    pub geburtsdatum: String,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no record matched")]
    NotFound,
    #[error("more than one record matched")]
    Ambiguous,
    #[error("record store responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("record store request failed: {0}")]
    Transport(String),
    #[error("invalid record store response: {0}")]
    Parse(String),
}

impl LookupError {
    /// True when the store answered but the filters did not single out one record.
    #[must_use]
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::NotFound | Self::Ambiguous)
    }
}

/// Point query over a record collection.
pub trait RecordStore: Send + Sync {
    /// Resolve `key` to exactly one record.
    fn find_single<'a>(&'a self, key: &'a LookupKey) -> LookupFuture<'a>;
}
