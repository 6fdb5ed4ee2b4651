use crate::assets::progress::LoadProgress;
use crate::errors::{Result, SceneError};

#[cfg(all(target_arch = "wasm32", not(feature = "http")))]
compile_error!("the `http` feature is required on wasm32");

#[cfg(not(target_arch = "wasm32"))]
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Local file reader resolving uris against a root directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileAssetReader {
    root_path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileAssetReader {
    pub fn new(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent()
                .unwrap_or(std::path::Path::new("."))
                .to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &std::path::Path {
        &self.root_path
    }

    /// Reads the file in chunks, reporting byte progress after each one.
    pub async fn read_bytes(
        &self,
        uri: &str,
        mut on_progress: impl FnMut(LoadProgress) + Send,
    ) -> Result<Vec<u8>> {
        use tokio::io::AsyncReadExt;

        let path = self.root_path.join(uri);
        let mut file = tokio::fs::File::open(&path).await?;
        let total = file.metadata().await?.len();
        on_progress(LoadProgress::new(0, total));

        let mut data = Vec::with_capacity(total as usize);
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let n = file.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..n]);
            let loaded = data.len() as u64;
            on_progress(LoadProgress::new(loaded, total.max(loaded)));
        }
        Ok(data)
    }
}

/// HTTP reader resolving uris against a URL prefix.
///
/// Absolute roots are joined with [`url::Url::join`]; relative roots (the
/// usual case in the browser) are joined textually and resolved by the fetch.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpAssetReader {
    root_url: Option<url::Url>,
    prefix: String,
}

#[cfg(feature = "http")]
impl HttpAssetReader {
    pub fn new(root: &str) -> Result<Self> {
        if root.starts_with("http://") || root.starts_with("https://") {
            let url = url::Url::parse(root)?;
            let root_url = if url.path().ends_with('/') {
                url
            } else {
                let mut u = url.clone();
                if let Ok(mut segments) = u.path_segments_mut() {
                    segments.pop();
                    segments.push("");
                }
                u
            };
            Ok(Self {
                root_url: Some(root_url),
                prefix: String::new(),
            })
        } else {
            let mut prefix = root.to_string();
            if !prefix.is_empty() && !prefix.ends_with('/') {
                prefix.push('/');
            }
            Ok(Self {
                root_url: None,
                prefix,
            })
        }
    }

    pub fn resolve(&self, uri: &str) -> Result<String> {
        match &self.root_url {
            Some(base) => Ok(base.join(uri)?.to_string()),
            None => Ok(format!("{}{}", self.prefix, uri.trim_start_matches("./"))),
        }
    }

    /// Fetches the whole body. Progress is reported once the response arrives.
    pub async fn read_bytes(
        &self,
        uri: &str,
        mut on_progress: impl FnMut(LoadProgress) + Send,
    ) -> Result<Vec<u8>> {
        let url = self.resolve(uri)?;
        let response = ehttp::fetch_async(ehttp::Request::get(&url))
            .await
            .map_err(SceneError::Http)?;
        if !response.ok {
            return Err(SceneError::HttpResponse {
                status: response.status,
            });
        }
        let len = response.bytes.len() as u64;
        on_progress(LoadProgress::new(len, len));
        Ok(response.bytes)
    }
}

/// Asset reader variants, selected from the asset root.
#[derive(Debug, Clone)]
pub enum AssetReader {
    #[cfg(not(target_arch = "wasm32"))]
    File(FileAssetReader),
    #[cfg(feature = "http")]
    Http(HttpAssetReader),
}

impl AssetReader {
    /// `http(s)://` roots read over HTTP, anything else from disk.
    /// On wasm every root is a URL prefix.
    pub fn from_root(root: &str) -> Result<Self> {
        #[cfg(target_arch = "wasm32")]
        {
            Ok(Self::Http(HttpAssetReader::new(root)?))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            if root.starts_with("http://") || root.starts_with("https://") {
                #[cfg(feature = "http")]
                {
                    Ok(Self::Http(HttpAssetReader::new(root)?))
                }
                #[cfg(not(feature = "http"))]
                {
                    Err(SceneError::FeatureNotEnabled(
                        "http (needed for remote asset roots)".into(),
                    ))
                }
            } else {
                let root = if root.is_empty() { "." } else { root };
                Ok(Self::File(FileAssetReader::new(root)))
            }
        }
    }

    pub async fn read_bytes(
        &self,
        uri: &str,
        on_progress: impl FnMut(LoadProgress) + Send,
    ) -> Result<Vec<u8>> {
        match self {
            #[cfg(not(target_arch = "wasm32"))]
            Self::File(r) => r.read_bytes(uri, on_progress).await,
            #[cfg(feature = "http")]
            Self::Http(r) => r.read_bytes(uri, on_progress).await,
        }
    }
}
