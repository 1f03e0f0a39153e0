use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    codec,
    foundation::error::{OperationError, ToolboxError, ToolboxResult},
    frame::Image,
};

/// Raw bytes returned by a fetch, with the MIME type the source declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The location could not be reached or read.
    #[error("network error: {0}")]
    Network(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Source of image bytes by URL.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError>;
}

/// Reads local paths and `file://` URLs, optionally relative to a root directory.
#[derive(Clone, Debug, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let raw = Path::new(url.strip_prefix("file://").unwrap_or(url));
        match &self.root {
            Some(root) if raw.is_relative() => root.join(raw),
            _ => raw.to_path_buf(),
        }
    }
}

impl ImageFetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let path = self.resolve(url);
        let bytes = std::fs::read(&path)
            .map_err(|e| FetchError::Network(format!("{}: {e}", path.display())))?;
        let mime = codec::sniff_mime(&bytes)
            .map(str::to_string)
            .or_else(|| {
                image::ImageFormat::from_path(&path)
                    .ok()
                    .map(|f| f.to_mime_type().to_string())
            })
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Ok(FetchedImage { bytes, mime })
    }
}

/// Fetch and decode one image, mapping failures to the user-facing error kinds.
#[tracing::instrument(skip(fetcher))]
pub fn load_image(fetcher: &dyn ImageFetcher, url: &str) -> ToolboxResult<Image> {
    let fetched = match fetcher.fetch(url) {
        Ok(f) => f,
        Err(FetchError::Network(msg)) => {
            tracing::debug!(%msg, "fetch failed");
            return Err(OperationError::FetchImageFailed {
                url: url.to_string(),
            }
            .into());
        }
        Err(FetchError::Other(e)) => {
            return Err(ToolboxError::Other(e.context(format!("fetch '{url}'"))));
        }
    };
    codec::decode(&fetched.bytes, &fetched.mime).map_err(|e| {
        tracing::debug!(error = %e, "decode failed");
        OperationError::InvalidImage {
            url: url.to_string(),
        }
        .into()
    })
}

/// Load every URL in order. Stops at the first failure.
pub fn load_images(fetcher: &dyn ImageFetcher, urls: &[String]) -> ToolboxResult<Vec<Image>> {
    urls.iter().map(|u| load_image(fetcher, u)).collect()
}

/// Write `bytes` to `path`, creating parent directories.
pub fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

#[cfg(test)]
#[path = "../../tests/unit/command/fetch.rs"]
mod tests;
