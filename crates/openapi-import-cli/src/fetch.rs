//! Spec text acquisition: HTTP fetch or inline content, plus optional digest verification.

use crate::config::HashPolicy;
use anyhow::Context as _;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Duration;
use unrelated_openapi_import::SpecSource;
use url::Url;

pub fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("build http client")
}

/// GET the spec. Redirects are followed; any non-2xx status is an error.
pub async fn fetch_spec(client: &Client, url: &str) -> anyhow::Result<String> {
    let url = Url::parse(url).with_context(|| format!("invalid spec URL '{url}'"))?;
    tracing::info!(url = %url, "Fetching OpenAPI spec");

    let resp = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url}"))?;
    resp.text()
        .await
        .with_context(|| format!("read body of {url}"))
}

pub fn read_spec_file(path: &Path) -> anyhow::Result<String> {
    tracing::info!(path = %path.display(), "Loading OpenAPI spec from file");
    std::fs::read_to_string(path).with_context(|| format!("read spec {}", path.display()))
}

/// Raw text for a resolved source. Inline content is returned as-is.
pub async fn spec_text(client: &Client, source: SpecSource) -> anyhow::Result<String> {
    match source {
        SpecSource::Url(url) => fetch_spec(client, &url).await,
        SpecSource::Inline(content) => Ok(content),
    }
}

/// `sha256:<hex>` digest of the raw spec text.
#[must_use]
pub fn spec_digest(content: &str) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(content.as_bytes())))
}

pub fn verify_spec_hash(content: &str, expected: &str, policy: HashPolicy) -> anyhow::Result<()> {
    if policy == HashPolicy::Ignore {
        return Ok(());
    }
    let actual = spec_digest(content);
    if actual.eq_ignore_ascii_case(expected) {
        return Ok(());
    }
    match policy {
        HashPolicy::Fail => {
            anyhow::bail!("Spec hash mismatch. Expected: {expected}, Got: {actual}")
        }
        HashPolicy::Warn => {
            tracing::warn!(expected, actual = %actual, "Spec hash mismatch");
            Ok(())
        }
        HashPolicy::Ignore => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP/1.1 response and return the base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0_u8; 4096];
            let _ = stream.read(&mut buf).await.unwrap();
            let resp = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/yaml\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(resp.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetches_spec_body() {
        let base = serve_once("200 OK", "openapi: 3.0.0\n").await;
        let client = build_client(Duration::from_secs(5)).unwrap();

        let text = fetch_spec(&client, &format!("{base}/openapi.yaml"))
            .await
            .unwrap();
        assert_eq!(text, "openapi: 3.0.0\n");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let base = serve_once("404 Not Found", "nope").await;
        let client = build_client(Duration::from_secs(5)).unwrap();

        let err = fetch_spec(&client, &format!("{base}/missing.yaml"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("GET "), "{err}");
        let status = err
            .downcast_ref::<reqwest::Error>()
            .and_then(reqwest::Error::status);
        assert_eq!(status, Some(reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_any_request() {
        let client = build_client(Duration::from_secs(5)).unwrap();
        let err = fetch_spec(&client, "not a url").await.unwrap_err();
        assert!(err.to_string().contains("invalid spec URL"), "{err}");
    }

    #[tokio::test]
    async fn inline_source_is_returned_verbatim() {
        let client = build_client(Duration::from_secs(5)).unwrap();
        let text = spec_text(&client, SpecSource::Inline("swagger: '2.0'".to_string()))
            .await
            .unwrap();
        assert_eq!(text, "swagger: '2.0'");
    }

    #[test]
    fn reads_spec_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(&path, r#"{"openapi":"3.1.0"}"#).unwrap();
        assert_eq!(read_spec_file(&path).unwrap(), r#"{"openapi":"3.1.0"}"#);

        let err = read_spec_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().starts_with("read spec "), "{err}");
    }

    #[test]
    fn digest_is_prefixed_sha256() {
        assert_eq!(
            spec_digest(""),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hash_policies() {
        let good = spec_digest("openapi: 3.0.0");
        let bad = spec_digest("openapi: 3.1.0");

        assert!(verify_spec_hash("openapi: 3.0.0", &good, HashPolicy::Fail).is_ok());
        // Hex case does not matter.
        let upper = format!("sha256:{}", good["sha256:".len()..].to_uppercase());
        assert!(verify_spec_hash("openapi: 3.0.0", &upper, HashPolicy::Fail).is_ok());

        let err = verify_spec_hash("openapi: 3.0.0", &bad, HashPolicy::Fail).unwrap_err();
        assert!(err.to_string().contains("Spec hash mismatch"), "{err}");

        assert!(verify_spec_hash("openapi: 3.0.0", &bad, HashPolicy::Warn).is_ok());
        assert!(verify_spec_hash("openapi: 3.0.0", &bad, HashPolicy::Ignore).is_ok());
    }
}
