//! Document downloader

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::config::DownloadConfig;
use crate::crawler::HttpTransport;
use crate::documents::DocumentRef;
use crate::storage::{
    artifact_path, brand_dir, content_hash, DownloadError, DownloadResult, DownloadedArtifact,
};
use crate::url::is_pdf_url;

/// Fetches document references and stores them content-addressed
#[derive(Debug, Clone)]
pub struct Downloader {
    transport: HttpTransport,
    out_dir: PathBuf,
    delay: Duration,
    concurrency: usize,
}

impl Downloader {
    pub fn new(config: &DownloadConfig, transport: HttpTransport) -> Self {
        Self {
            transport,
            out_dir: config.out_dir.clone(),
            delay: config.delay(),
            concurrency: config.concurrency.max(1),
        }
    }

    /// Downloads and stores one document
    ///
    /// A HEAD probe reads the Content-Type first; the document is skipped
    /// when neither the type nor the URL says PDF. A failed probe is
    /// ignored and the GET is attempted anyway.
    pub async fn download_one(
        &self,
        doc: &DocumentRef,
        brand: &str,
    ) -> DownloadResult<DownloadedArtifact> {
        let url = Url::parse(&doc.url).map_err(|source| DownloadError::InvalidUrl {
            url: doc.url.clone(),
            source,
        })?;

        match self.transport.head_content_type(&url).await {
            Ok(content_type) => {
                let content_type = content_type.unwrap_or_default();
                if !content_type.contains("pdf") && !is_pdf_url(url.as_str()) {
                    return Err(DownloadError::NotPdf {
                        url: doc.url.clone(),
                        content_type,
                    });
                }
            }
            Err(e) => tracing::debug!("HEAD probe failed for {}: {}", url, e),
        }

        let body = self.transport.get_bytes(&url).await?;
        let hash = content_hash(&body);
        let path = artifact_path(&self.out_dir, brand, &hash);

        let io_error = |source: std::io::Error| DownloadError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!("{} already stored as {}", url, path.display());
        } else {
            tokio::fs::write(&path, &body).await.map_err(io_error)?;
        }

        Ok(DownloadedArtifact {
            url: doc.url.clone(),
            file_path: path,
            byte_size: body.len(),
            content_hash: hash,
            associated_text: doc.associated_text.clone(),
        })
    }

    /// Downloads every document, skipping the ones that fail
    ///
    /// Artifacts are returned in input order. With `concurrency` above 1 the
    /// downloads overlap; the post-save delay then applies per task.
    pub async fn download_all(&self, docs: &[DocumentRef], brand: &str) -> Vec<DownloadedArtifact> {
        let dir = brand_dir(&self.out_dir, brand);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            tracing::warn!("Failed to create {}: {}", dir.display(), e);
        }

        if self.concurrency > 1 && docs.len() > 1 {
            return self.download_concurrent(docs, brand).await;
        }

        let total = docs.len();
        let mut saved = Vec::new();
        for (i, doc) in docs.iter().enumerate() {
            if let Some(artifact) = self.download_logged(doc, brand, i + 1, total).await {
                saved.push(artifact);
                self.pause().await;
            }
        }
        saved
    }

    async fn download_concurrent(&self, docs: &[DocumentRef], brand: &str) -> Vec<DownloadedArtifact> {
        let total = docs.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (i, doc) in docs.iter().cloned().enumerate() {
            let downloader = self.clone();
            let brand = brand.to_string();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let artifact = downloader.download_logged(&doc, &brand, i + 1, total).await;
                if artifact.is_some() {
                    downloader.pause().await;
                }
                artifact.map(|a| (i, a))
            });
        }

        let mut indexed = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(entry)) => indexed.push(entry),
                Ok(None) => {}
                Err(e) => tracing::warn!("Download task failed: {}", e),
            }
        }

        indexed.sort_by_key(|(i, _)| *i);
        indexed.into_iter().map(|(_, artifact)| artifact).collect()
    }

    async fn download_logged(
        &self,
        doc: &DocumentRef,
        brand: &str,
        position: usize,
        total: usize,
    ) -> Option<DownloadedArtifact> {
        match self.download_one(doc, brand).await {
            Ok(artifact) => {
                tracing::info!(
                    "[{}/{}] Saved {}",
                    position,
                    total,
                    artifact.file_path.display()
                );
                Some(artifact)
            }
            Err(DownloadError::NotPdf { url, content_type }) => {
                tracing::info!("Skip non-PDF: {} (ct={})", url, content_type);
                None
            }
            Err(e) => {
                tracing::warn!("Download failed {}: {}", doc.url, e);
                None
            }
        }
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
