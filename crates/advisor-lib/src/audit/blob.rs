//! Remote blob audit log
//!
//! The blob is addressed by a single URL (typically carrying a SAS token).
//! Appending is a read-modify-write: download the current content, append
//! the new line, upload the whole blob again. There is no compare-and-swap,
//! so concurrent writers can overwrite each other's entries.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use super::{async_trait, AuditEntry, AuditSink};
use crate::error::AuditError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Audit sink backed by an HTTP-addressable blob
pub struct BlobAuditSink {
    client: Client,
    url: Url,
    name: String,
}

impl BlobAuditSink {
    pub fn new(url: &str) -> Result<Self, AuditError> {
        let url = Url::parse(url)?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        // Query strings carry credentials, keep them out of logs
        let name = format!(
            "blob:{}{}",
            url.host_str().unwrap_or("unknown"),
            url.path()
        );
        Ok(Self { client, url, name })
    }

    async fn download(&self) -> Result<String, AuditError> {
        let response = self.client.get(self.url.clone()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(String::new()),
            status if status.is_success() => Ok(response.text().await?),
            status => Err(AuditError::UnexpectedStatus {
                operation: "download",
                status: status.as_u16(),
            }),
        }
    }

    async fn upload(&self, content: String) -> Result<(), AuditError> {
        let response = self
            .client
            .put(self.url.clone())
            .header("content-type", "application/x-ndjson")
            .header("x-ms-blob-type", "BlockBlob")
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::UnexpectedStatus {
                operation: "upload",
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AuditSink for BlobAuditSink {
    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let line = entry.to_json_line()?;
        let mut content = self.download().await?;
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&line);
        self.upload(content).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
