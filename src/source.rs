use crate::error::{GpkgError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// Where to read a GeoPackage from: a remote URL, a local file path, or an
/// in-memory byte buffer.
#[derive(Clone, Debug)]
pub enum GpkgSource {
    Url(Url),
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl GpkgSource {
    /// Fetch the entire GeoPackage as a byte buffer.
    ///
    /// A single attempt is made; a failed fetch is a final failure for the
    /// load that requested it.
    pub fn fetch_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Url(url) => fetch_url(url),
            Self::Path(path) => Ok(std::fs::read(path)?),
            Self::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

impl FromStr for GpkgSource {
    type Err = GpkgError;

    /// Classify a string as URL-like (it carries a scheme) or as a
    /// filesystem path.
    fn from_str(s: &str) -> Result<Self> {
        if s.contains("://") {
            let url = Url::parse(s).map_err(|err| GpkgError::InvalidSource(err.to_string()))?;
            Ok(Self::Url(url))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl From<Url> for GpkgSource {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

impl From<PathBuf> for GpkgSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for GpkgSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for GpkgSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

fn fetch_url(url: &Url) -> Result<Vec<u8>> {
    match url.scheme() {
        "http" | "https" => fetch_http(url),
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| GpkgError::InvalidSource(format!("not a local file URL: {url}")))?;
            Ok(std::fs::read(path)?)
        }
        scheme => Err(GpkgError::InvalidSource(format!(
            "unsupported URL scheme '{scheme}': {url}"
        ))),
    }
}

fn fetch_http(url: &Url) -> Result<Vec<u8>> {
    let response = ureq::get(url.as_str()).call().map_err(|err| match err {
        ureq::Error::Status(status, _) => GpkgError::SourceUnreachable {
            url: url.to_string(),
            status: Some(status),
            detail: format!("HTTP status {status}"),
        },
        ureq::Error::Transport(transport) => GpkgError::SourceUnreachable {
            url: url.to_string(),
            status: None,
            detail: transport.to_string(),
        },
    })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|err| GpkgError::SourceUnreachable {
            url: url.to_string(),
            status: None,
            detail: err.to_string(),
        })?;
    Ok(bytes)
}
