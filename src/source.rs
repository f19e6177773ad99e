//! Where the raw bytes of a dataset come from.
//!
//! Local files are read directly. Fetching a URL is delegated to a
//! caller-supplied [`Fetch`] implementation, so the library itself carries no
//! HTTP client.

use log::debug;
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::error::{Error, Result};

/// Retrieves the bytes behind a URL.
pub trait Fetch {
    /// # Errors
    ///
    /// Implementations report failures as [`Error::Fetch`].
    fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

impl<F> Fetch for F
where
    F: Fn(&Url) -> Result<Vec<u8>>,
{
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        self(url)
    }
}

/// A dataset location entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(Url),
}

impl DataSource {
    /// Classifies a user-entered location.
    ///
    /// `http` and `https` URLs are remote sources, `file://` URLs and plain
    /// paths are local files.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(Error::InvalidInput("empty data source".to_string()));
        }

        match Url::parse(location) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(DataSource::Url(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(DataSource::File)
                .map_err(|()| Error::InvalidInput(format!("not a local file URL: {}", location))),
            // Windows drive letters and relative paths land here too
            _ => Ok(DataSource::File(PathBuf::from(location))),
        }
    }

    /// Whether this source needs a [`Fetch`] implementation.
    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Url(_))
    }

    /// Reads the raw bytes of the source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when the file cannot be read, when the fetcher
    /// fails, or when a URL is given without a fetcher.
    pub fn read_bytes(&self, fetcher: Option<&dyn Fetch>) -> Result<Vec<u8>> {
        match self {
            DataSource::File(path) => {
                debug!("reading {}", path.display());
                std::fs::read(path)
                    .map_err(|e| Error::Fetch(format!("cannot read {}: {}", path.display(), e)))
            }
            DataSource::Url(url) => {
                let fetcher = fetcher.ok_or_else(|| {
                    Error::Fetch(format!("no HTTP client available to fetch {}", url))
                })?;
                debug!("fetching {}", url);
                fetcher.fetch(url)
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}
