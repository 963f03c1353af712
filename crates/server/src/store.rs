//! File-backed order history.
//!
//! Two JSON files live under the data directory:
//!
//! - `orders.json` - every placed order, oldest first
//! - `last_order.json` - the most recently placed order, read by the
//!   confirmation page
//!
//! Writes take the store's mutex and go through a `.tmp` sibling that is
//! renamed into place, so readers never observe a half-written file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cookie_haven_core::{Order, OrderId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

const ORDERS_FILE: &str = "orders.json";
const LAST_ORDER_FILE: &str = "last_order.json";

/// Errors from reading or writing order history.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A history file does not contain valid JSON.
    #[error("Corrupt order file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An order could not be encoded for writing.
    #[error("Cannot serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The data directory does not exist.
    #[error("Order directory not found: {0}")]
    MissingDir(PathBuf),
}

/// Order history persisted as JSON files.
#[derive(Debug)]
pub struct OrderStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl OrderStore {
    /// Open (and create if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Open an existing store without creating its directory.
    ///
    /// # Errors
    ///
    /// Returns `MissingDir` if `dir` is not an existing directory.
    pub async fn open_existing(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(Self {
                dir,
                write_lock: Mutex::new(()),
            }),
            Ok(_) => Err(StoreError::MissingDir(dir)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::MissingDir(dir)),
            Err(source) => Err(StoreError::Io { path: dir, source }),
        }
    }

    /// Directory holding the history files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append an order to history and record it as the last order.
    ///
    /// Once history is written the order is placed. A failure to update
    /// `last_order.json` is only logged, since `last()` falls back to
    /// history.
    ///
    /// # Errors
    ///
    /// Returns error if history cannot be read or written.
    pub async fn append(&self, order: &Order) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut orders = self.read_history().await?;
        orders.push(order.clone());

        write_json(&self.orders_path(), &orders).await?;
        if let Err(e) = write_json(&self.last_order_path(), order).await {
            tracing::warn!(order_id = %order.id, error = %e, "Failed to record last order");
        }

        tracing::debug!(order_id = %order.id, history_len = orders.len(), "Order recorded");
        Ok(())
    }

    /// Every recorded order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the history file exists but cannot be read.
    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.read_history().await
    }

    /// The order the confirmation page should show.
    ///
    /// Prefers the recorded last order. If that is missing or unreadable,
    /// falls back to the newest order in history.
    ///
    /// # Errors
    ///
    /// Returns error if the history file exists but cannot be read.
    pub async fn last(&self) -> Result<Option<Order>, StoreError> {
        match read_json::<Order>(&self.last_order_path()).await {
            Ok(Some(order)) => return Ok(Some(order)),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable last order"),
        }

        Ok(self.read_history().await?.pop())
    }

    /// Look up a single order by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the history file exists but cannot be read.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self
            .read_history()
            .await?
            .into_iter()
            .find(|order| &order.id == id))
    }

    async fn read_history(&self) -> Result<Vec<Order>, StoreError> {
        Ok(read_json(&self.orders_path()).await?.unwrap_or_default())
    }

    fn orders_path(&self) -> PathBuf {
        self.dir.join(ORDERS_FILE)
    }

    fn last_order_path(&self) -> PathBuf {
        self.dir.join(LAST_ORDER_FILE)
    }
}

/// Read a JSON file, treating a missing file as `None`.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

/// Write JSON to `path` via a temporary sibling and rename.
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    let io_err = |source| StoreError::Io {
        path: tmp.clone(),
        source,
    };
    tokio::fs::write(&tmp, &bytes).await.map_err(io_err)?;
    if let Err(source) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_err(source));
    }
    Ok(())
}
