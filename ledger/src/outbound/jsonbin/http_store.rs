//! Reqwest-backed JSONBin document store.
//!
//! This adapter owns transport details only: endpoint construction, the
//! credential header, HTTP error mapping, and JSON decoding of the bin
//! envelope. Each call is attempted exactly once.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::config::JsonBinConfig;
use super::dto::LatestRecordDto;
use crate::domain::LedgerDocument;
use crate::domain::ports::{DocumentStoreError, LedgerDocumentStore};

/// Document store reading and overwriting one JSONBin bin.
pub struct JsonBinDocumentStore {
    client: Client,
    config: JsonBinConfig,
}

impl JsonBinDocumentStore {
    /// Build an adapter, applying the configured timeout to the client.
    /// ```rust,ignore
    /// let store = JsonBinDocumentStore::new(JsonBinConfig::try_default()?);
    /// assert!(store.is_ok() || store.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: JsonBinConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Configuration this adapter was built with.
    pub fn config(&self) -> &JsonBinConfig {
        &self.config
    }

    fn credentials(&self) -> Result<(&str, &str), DocumentStoreError> {
        let missing = self.config.missing_settings();
        let credential = self.config.credential.as_ref().map(|value| value.as_str());
        match (credential, self.config.bin_id.as_deref()) {
            (Some(credential), Some(bin_id)) if missing.is_empty() => Ok((credential, bin_id)),
            _ => Err(DocumentStoreError::configuration(format!(
                "missing {}",
                missing.join(" and ")
            ))),
        }
    }

    fn endpoint(&self, bin_id: &str, latest: bool) -> Result<Url, DocumentStoreError> {
        bin_endpoint(&self.config.base_url, bin_id, latest)
    }
}

fn bin_endpoint(base_url: &Url, bin_id: &str, latest: bool) -> Result<Url, DocumentStoreError> {
    let mut url = base_url.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            DocumentStoreError::configuration(format!("base URL {base_url} cannot carry a path"))
        })?;
        segments.pop_if_empty().push("b").push(bin_id);
        if latest {
            segments.push("latest");
        }
    }
    Ok(url)
}

#[async_trait]
impl LedgerDocumentStore for JsonBinDocumentStore {
    async fn fetch_document(&self) -> Result<LedgerDocument, DocumentStoreError> {
        let (credential, bin_id) = self.credentials()?;
        let url = self.endpoint(bin_id, true)?;
        debug!(%url, "fetching ledger document");

        let response = self
            .client
            .get(url)
            .header(self.config.credential_header.header_name(), credential)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_record(body.as_ref())
    }

    async fn persist_document(&self, document: &LedgerDocument) -> Result<(), DocumentStoreError> {
        let (credential, bin_id) = self.credentials()?;
        let url = self.endpoint(bin_id, false)?;
        debug!(
            %url,
            players = document.players.len(),
            transactions = document.transactions.len(),
            "writing ledger document"
        );

        let response = self
            .client
            .put(url)
            .header(self.config.credential_header.header_name(), credential)
            .json(document)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn parse_record(body: &[u8]) -> Result<LedgerDocument, DocumentStoreError> {
    let decoded: LatestRecordDto = serde_json::from_slice(body).map_err(|error| {
        DocumentStoreError::decode(format!("invalid JSONBin payload: {error}"))
    })?;
    Ok(decoded.into_document())
}

fn map_transport_error(error: reqwest::Error) -> DocumentStoreError {
    if error.is_timeout() {
        DocumentStoreError::timeout(error.to_string())
    } else {
        DocumentStoreError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DocumentStoreError {
    let body_preview = body_preview(body);
    debug!(status = status.as_u16(), body = %body_preview, "JSONBin rejected request");
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DocumentStoreError::timeout(message)
        }
        _ => DocumentStoreError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network helpers and credential preconditions.

    use super::*;
    use crate::outbound::jsonbin::CredentialHeader;
    use rstest::rstest;

    fn base(raw: &str) -> Url {
        Url::parse(raw).expect("valid base URL")
    }

    #[rstest]
    #[case::latest("https://api.jsonbin.io/v3", true, "https://api.jsonbin.io/v3/b/abc123/latest")]
    #[case::update("https://api.jsonbin.io/v3", false, "https://api.jsonbin.io/v3/b/abc123")]
    #[case::trailing_slash("http://127.0.0.1:9000/v3/", true, "http://127.0.0.1:9000/v3/b/abc123/latest")]
    fn builds_bin_endpoints(#[case] root: &str, #[case] latest: bool, #[case] expected: &str) {
        let url = bin_endpoint(&base(root), "abc123", latest).expect("endpoint builds");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn escapes_bin_ids_as_single_segments() {
        let url = bin_endpoint(&base("https://api.jsonbin.io/v3"), "a/b", false)
            .expect("endpoint builds");
        assert_eq!(url.as_str(), "https://api.jsonbin.io/v3/b/a%2Fb");
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, false)]
    #[case::not_found(StatusCode::NOT_FOUND, false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn maps_statuses_to_port_errors(#[case] status: StatusCode, #[case] is_timeout: bool) {
        let error = map_status_error(status, b"{\"message\":\"Bin not found\"}");
        if is_timeout {
            assert!(matches!(error, DocumentStoreError::Timeout { .. }));
        } else {
            assert!(matches!(error, DocumentStoreError::Transport { .. }));
        }
        assert!(error.to_string().contains(&status.as_u16().to_string()));
    }

    #[test]
    fn previews_are_compacted_and_truncated() {
        let body = format!("{{ \"message\":\n  \"{}\" }}", "x".repeat(400));
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert!(!preview.contains('\n'));
    }

    #[test]
    fn parses_record_envelope() {
        let body = r#"{
            "record": {
                "players": [
                    { "id": "p1", "name": "Alice", "balance": 500, "registered": "2024-05-01T09:30:00.000Z" }
                ],
                "transactions": []
            },
            "metadata": { "id": "abc123", "private": true }
        }"#;

        let document = parse_record(body.as_bytes()).expect("envelope decodes");
        assert_eq!(document.players.len(), 1);
        assert_eq!(document.players[0].name, "Alice");
    }

    #[rstest]
    #[case::missing(r#"{ "metadata": {} }"#)]
    #[case::null(r#"{ "record": null }"#)]
    fn absent_records_decode_as_empty_document(#[case] body: &str) {
        let document = parse_record(body.as_bytes()).expect("envelope decodes");
        assert_eq!(document, LedgerDocument::default());
    }

    #[test]
    fn rejects_malformed_records() {
        let error = parse_record(br#"{ "record": { "players": 3 } }"#).expect_err("must fail");
        assert!(matches!(error, DocumentStoreError::Decode { .. }));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let config = JsonBinConfig::try_default().expect("default URL parses");
        let store = JsonBinDocumentStore::new(config).expect("client builds");

        let read = store.fetch_document().await.expect_err("read must fail");
        let write = store
            .persist_document(&LedgerDocument::default())
            .await
            .expect_err("write must fail");

        assert_eq!(
            read,
            DocumentStoreError::configuration("missing credential and bin id")
        );
        assert!(matches!(write, DocumentStoreError::Configuration { .. }));
    }

    #[tokio::test]
    async fn missing_bin_id_is_named() {
        let config = JsonBinConfig::try_default()
            .expect("default URL parses")
            .with_credential(CredentialHeader::AccessKey, "key-123");
        let store = JsonBinDocumentStore::new(config).expect("client builds");

        let error = store.fetch_document().await.expect_err("read must fail");
        assert_eq!(error, DocumentStoreError::configuration("missing bin id"));
    }
}
