// ABOUTME: Source of the registered API clients consulted on every authentication
// ABOUTME: A JSON file re-read per lookup, plus a fixed in-memory list

use crate::gateway::auth::ClientRecord;
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of registered clients, consulted on every authentication.
pub trait ClientRegistry: Send + Sync {
    fn load_clients(&self) -> impl Future<Output = Result<Vec<ClientRecord>, RegistryError>> + Send;
}

/// JSON array of `{name, api_key}` objects, re-read on every call so edits
/// take effect without a restart.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClientRegistry for FileRegistry {
    async fn load_clients(&self) -> Result<Vec<ClientRecord>, RegistryError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| RegistryError::Io {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_slice(&raw).map_err(|source| RegistryError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Fixed in-memory registry
impl ClientRegistry for Vec<ClientRecord> {
    async fn load_clients(&self) -> Result<Vec<ClientRecord>, RegistryError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("smsgate-{}-{name}", std::process::id()))
    }

    #[tokio::test]
    async fn reads_file_on_every_call() {
        let path = temp_path("clients.json");
        tokio::fs::write(&path, r#"[{"name":"shop","api_key":"a"}]"#)
            .await
            .unwrap();
        let registry = FileRegistry::new(&path);
        assert_eq!(
            registry.load_clients().await.unwrap(),
            vec![ClientRecord::new("shop", "a")]
        );

        tokio::fs::write(&path, r#"[{"name":"shop","api_key":"b"}]"#)
            .await
            .unwrap();
        assert_eq!(registry.load_clients().await.unwrap()[0].api_key, "b");

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let registry = FileRegistry::new(temp_path("does-not-exist.json"));
        assert!(matches!(
            registry.load_clients().await,
            Err(RegistryError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn malformed_file_is_parse_error() {
        let path = temp_path("broken.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        let result = FileRegistry::new(&path).load_clients().await;
        assert!(matches!(result, Err(RegistryError::Parse { .. })));
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
