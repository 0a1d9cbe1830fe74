//! [`RecordStore`] backed by a PostgREST endpoint (the Supabase REST API).
//!
//! Lookups are issued as
//! `GET {base}/rest/v1/{table}?select=*&sender=eq.{phone}&geburtsdatum=eq.{date}`
//! in single-object mode (`Accept: application/vnd.pgrst.object+json`), so the
//! server itself asserts that exactly one row matched. When it did not,
//! PostgREST answers `406` with error code `PGRST116` and the row count in
//! `details`.

use super::{LookupError, LookupFuture, LookupKey, Record, RecordStore};
use crate::APP_USER_AGENT;
use anyhow::{Context, Result};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_TABLE: &str = "stammdaten";

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const NOT_SINGLE_ROW: &str = "PGRST116";

#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: Client,
    endpoint: Url,
    api_key: SecretString,
}

impl PostgrestStore {
    /// Build a store for `table` under the project at `base_url`.
    ///
    /// `timeout` bounds each lookup; `None` waits indefinitely.
    ///
    /// # Errors
    /// Returns an error if the table endpoint cannot be derived from `base_url`
    /// or the HTTP client cannot be built.
    pub fn new(
        base_url: &Url,
        table: &str,
        api_key: SecretString,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let endpoint = table_endpoint(base_url, table)?;

        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        debug!("record store endpoint: {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn auth_headers(&self) -> Result<HeaderMap, LookupError> {
        let key = self.api_key.expose_secret();
        let invalid = |_| LookupError::Transport("API key is not a valid header value".to_string());

        let mut apikey = HeaderValue::from_str(key).map_err(invalid)?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));
        Ok(headers)
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn fetch(&self, key: &LookupKey) -> Result<Record, LookupError> {
        let sender = format!("eq.{}", key.sender);
        let geburtsdatum = format!("eq.{}", key.geburtsdatum);

        let response = self
            .client
            .get(self.endpoint.clone())
            .headers(self.auth_headers()?)
            .query(&[
                ("select", "*"),
                ("sender", sender.as_str()),
                ("geburtsdatum", geburtsdatum.as_str()),
            ])
            .send()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        let status = response.status();
        debug!("record store status: {}", status);

        if status.is_success() {
            let body: Value = response
                .json()
                .await
                .map_err(|err| LookupError::Parse(err.to_string()))?;
            return single_record(body);
        }

        // Error bodies are best effort; a proxy in front may not send JSON.
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(classify_error(status, &body))
    }
}

impl RecordStore for PostgrestStore {
    fn find_single<'a>(&'a self, key: &'a LookupKey) -> LookupFuture<'a> {
        Box::pin(self.fetch(key))
    }
}

fn table_endpoint(base_url: &Url, table: &str) -> Result<Url> {
    if table.is_empty() || table.contains(['/', '?', '#']) {
        anyhow::bail!("invalid table name: {table:?}");
    }

    // `Url::join` drops the last path segment unless the base ends with `/`.
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&format!("rest/v1/{table}"))
        .with_context(|| format!("Failed to build endpoint for table {table}"))
}

// Object mode already yields one object; an array means the server ignored
// the Accept header, so enforce the single-row rule here.
fn single_record(body: Value) -> Result<Record, LookupError> {
    match body {
        Value::Object(_) => Ok(body),
        Value::Array(mut rows) => match rows.len() {
            0 => Err(LookupError::NotFound),
            1 => Ok(rows.remove(0)),
            _ => Err(LookupError::Ambiguous),
        },
        other => Err(LookupError::Parse(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

fn classify_error(status: StatusCode, body: &Value) -> LookupError {
    if status == StatusCode::NOT_ACCEPTABLE && body["code"].as_str() == Some(NOT_SINGLE_ROW) {
        return match body["details"].as_str().and_then(row_count) {
            Some(0) | None => LookupError::NotFound,
            Some(_) => LookupError::Ambiguous,
        };
    }

    let message = body["message"]
        .as_str()
        .or_else(|| status.canonical_reason())
        .unwrap_or_default()
        .to_string();

    LookupError::Status {
        status: status.as_u16(),
        message,
    }
}

// "The result contains 2 rows" -> 2
fn row_count(details: &str) -> Option<u64> {
    details.split_whitespace().rev().nth(1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "anon-key";

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn key() -> LookupKey {
        LookupKey {
            sender: "+15551234567".to_string(),
            geburtsdatum: "1990-05-02".to_string(),
        }
    }

    fn store(server: &MockServer, timeout: Option<Duration>) -> Result<PostgrestStore> {
        let base = Url::parse(&server.uri())?;
        PostgrestStore::new(
            &base,
            DEFAULT_TABLE,
            SecretString::from(API_KEY.to_string()),
            timeout,
        )
    }

    #[test]
    fn endpoint_joins_table_under_rest_v1() -> Result<()> {
        let cases = [
            (
                "https://project.supabase.co",
                "https://project.supabase.co/rest/v1/stammdaten",
            ),
            (
                "https://project.supabase.co/",
                "https://project.supabase.co/rest/v1/stammdaten",
            ),
            (
                "https://gateway.example/supabase",
                "https://gateway.example/supabase/rest/v1/stammdaten",
            ),
        ];
        for (base, expected) in cases {
            let endpoint = table_endpoint(&Url::parse(base)?, DEFAULT_TABLE)?;
            assert_eq!(endpoint.as_str(), expected);
        }
        Ok(())
    }

    #[test]
    fn endpoint_rejects_bad_table_names() -> Result<()> {
        let base = Url::parse("https://project.supabase.co")?;
        for table in ["", "a/b", "a?b", "a#b"] {
            assert!(table_endpoint(&base, table).is_err(), "{table:?}");
        }
        Ok(())
    }

    #[test]
    fn row_count_from_details() {
        assert_eq!(row_count("The result contains 0 rows"), Some(0));
        assert_eq!(row_count("The result contains 12 rows"), Some(12));
        assert_eq!(row_count("multiple rows"), None);
        assert_eq!(row_count(""), None);
    }

    #[test]
    fn classify_pgrst116() {
        let none = json!({ "code": "PGRST116", "details": "The result contains 0 rows" });
        let many = json!({ "code": "PGRST116", "details": "The result contains 2 rows" });
        assert!(matches!(
            classify_error(StatusCode::NOT_ACCEPTABLE, &none),
            LookupError::NotFound
        ));
        assert!(matches!(
            classify_error(StatusCode::NOT_ACCEPTABLE, &many),
            LookupError::Ambiguous
        ));
    }

    #[test]
    fn classify_other_statuses() {
        let body = json!({ "message": "Invalid API key" });
        match classify_error(StatusCode::UNAUTHORIZED, &body) {
            LookupError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match classify_error(StatusCode::BAD_GATEWAY, &Value::Null) {
            LookupError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn single_record_from_array() {
        assert!(matches!(single_record(json!([])), Err(LookupError::NotFound)));
        assert!(matches!(
            single_record(json!([{ "id": 1 }, { "id": 2 }])),
            Err(LookupError::Ambiguous)
        ));
        assert!(matches!(single_record(json!([{ "id": 1 }])), Ok(record) if record["id"] == 1));
        assert!(matches!(single_record(json!("x")), Err(LookupError::Parse(_))));
    }

    #[tokio::test]
    async fn find_single_sends_filters_and_credentials() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/stammdaten"))
            .and(query_param("select", "*"))
            .and(query_param("sender", "eq.+15551234567"))
            .and(query_param("geburtsdatum", "eq.1990-05-02"))
            .and(header("apikey", API_KEY))
            .and(header("authorization", "Bearer anon-key"))
            .and(header("accept", SINGLE_OBJECT))
            .and(header("user-agent", APP_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sender": "+15551234567",
                "geburtsdatum": "1990-05-02"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = store(&server, None)?.find_single(&key()).await?;
        assert_eq!(record["sender"], "+15551234567");
        Ok(())
    }

    #[tokio::test]
    async fn find_single_maps_no_rows_to_not_found() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/stammdaten"))
            .respond_with(ResponseTemplate::new(406).set_body_json(json!({
                "code": "PGRST116",
                "details": "The result contains 0 rows",
                "hint": null,
                "message": "JSON object requested, multiple (or no) rows returned"
            })))
            .mount(&server)
            .await;

        let result = store(&server, None)?.find_single(&key()).await;
        assert!(matches!(result, Err(LookupError::NotFound)));
        Ok(())
    }

    #[tokio::test]
    async fn find_single_times_out_as_transport_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/stammdaten"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let result = store(&server, Some(Duration::from_millis(200)))?
            .find_single(&key())
            .await;
        assert!(matches!(result, Err(LookupError::Transport(_))));
        Ok(())
    }

    #[tokio::test]
    async fn find_single_reports_unreachable_store() -> Result<()> {
        // Grab a free port, then release it so nothing is listening there.
        let port = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener.local_addr()?.port(),
            Err(_) => {
                eprintln!("Skipping test: cannot bind localhost");
                return Ok(());
            }
        };
        let base = Url::parse(&format!("http://127.0.0.1:{port}"))?;
        let store = PostgrestStore::new(
            &base,
            DEFAULT_TABLE,
            SecretString::from(API_KEY.to_string()),
            Some(Duration::from_secs(2)),
        )?;

        let result = store.find_single(&key()).await;
        assert!(matches!(result, Err(LookupError::Transport(_))));
        Ok(())
    }
}
