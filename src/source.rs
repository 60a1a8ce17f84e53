use crate::errors::FetchError;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use std::{path::PathBuf, time::Duration};
use tokio::fs;

/// Where the manifest, data files and schema live: a local directory or an
/// HTTP base URL. Every fetch goes to the origin; nothing is cached.
#[derive(Debug, Clone)]
pub enum DataSource {
    Dir(PathBuf),
    Http { base: Url, client: Client },
}

impl DataSource {
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self::Dir(path.into())
    }

    pub fn http(base: &str, timeout: Duration) -> Result<Self, Box<dyn std::error::Error>> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::Http { base, client })
    }

    /// `http://` and `https://` locations become HTTP sources, anything else a
    /// directory.
    pub fn from_location(
        location: &str,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::http(location, timeout)
        } else {
            Ok(Self::dir(location))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Dir(path) => path.display().to_string(),
            Self::Http { base, .. } => base.to_string(),
        }
    }

    pub async fn fetch(&self, name: &str) -> Result<Vec<u8>, FetchError> {
        if !is_plain_name(name) {
            return Err(FetchError::InvalidName(name.to_string()));
        }

        match self {
            Self::Dir(root) => fs::read(root.join(name)).await.map_err(|source| FetchError::Io {
                name: name.to_string(),
                source,
            }),
            Self::Http { base, client } => {
                let url = base
                    .join(name)
                    .map_err(|_| FetchError::InvalidName(name.to_string()))?;
                let http_err = |source| FetchError::Http {
                    name: name.to_string(),
                    source,
                };
                let response = client
                    .get(url)
                    .header(header::CACHE_CONTROL, "no-cache")
                    .header(header::PRAGMA, "no-cache")
                    .send()
                    .await
                    .map_err(http_err)?;
                if !response.status().is_success() {
                    return Err(FetchError::Status {
                        name: name.to_string(),
                        status: response.status().as_u16(),
                    });
                }
                let bytes = response.bytes().await.map_err(http_err)?;
                Ok(bytes.to_vec())
            }
        }
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, FetchError> {
        let bytes = self.fetch(name).await?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Parse {
            name: name.to_string(),
            source,
        })
    }
}

// Names come from the manifest; keep them inside the data source.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.contains('\\')
        && !name.contains("://")
        && name.split('/').all(|part| !part.is_empty() && part != "." && part != "..")
}
