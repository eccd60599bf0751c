//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking. Uniqueness of both digest and
//! certificate identifier is enforced by the table's UNIQUE constraints; an
//! insert is a single statement, so a rejected write leaves nothing behind.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use proofvid_core::{Certificate, CertificateId, Digest};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{InsertResult, Store};

const SELECT_CERTIFICATE: &str =
    "SELECT video_hash, certificate_id, timestamp, device_info, location, metadata
     FROM certificates";

/// Connection settings for [`SqliteStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long a writer waits for another connection's lock before failing.
    pub busy_timeout: Duration,
    /// Use write-ahead logging for file-backed databases.
    pub wal: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            wal: true,
        }
    }
}

/// SQLite-based store implementation.
///
/// Owns one connection shared behind a mutex that is held only for the
/// duration of a single operation. Several `SqliteStore`s (or processes) may
/// open the same file; SQLite's locking and constraints keep them consistent.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path with default settings.
    ///
    /// Creates the file and runs migrations if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &StoreConfig::default())
    }

    /// Open a SQLite database at the given path.
    pub fn open_with(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.busy_timeout(config.busy_timeout)?;

        if config.wal {
            let mode: String =
                conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            tracing::debug!(
                path = %path.display(),
                journal_mode = %mode,
                "opened certificate store"
            );
        }

        Self::from_connection(conn)
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn row_to_certificate(row: &rusqlite::Row<'_>) -> rusqlite::Result<Certificate> {
    // Older databases may hold an empty digest, and their free-text columns
    // are nullable.
    Ok(Certificate {
        digest: Digest::from_stored(row.get(0)?),
        certificate_id: CertificateId::from_string(row.get::<_, String>(1)?),
        issued_at: row.get(2)?,
        device_info: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        location: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        metadata: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn digest_exists(conn: &Connection, digest: &Digest) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM certificates WHERE video_hash = ?1",
            params![digest.as_str()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert(&self, certificate: &Certificate) -> Result<InsertResult> {
        let certificate = certificate.clone();

        self.with_conn(move |conn| {
            let result = conn.execute(
                "INSERT INTO certificates (
                    video_hash, certificate_id, timestamp, device_info, location, metadata
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    certificate.digest.as_str(),
                    certificate.certificate_id.as_str(),
                    certificate.issued_at,
                    certificate.device_info,
                    certificate.location,
                    certificate.metadata,
                ],
            );

            match result {
                Ok(_) => {
                    tracing::debug!(digest = %certificate.digest, "certificate row written");
                    Ok(InsertResult::Inserted)
                }
                // The statement was rejected as a whole; classify by column.
                // Rows are never deleted, so a present digest means the
                // digest constraint fired.
                Err(e) if is_unique_violation(&e) => {
                    if digest_exists(conn, &certificate.digest)? {
                        Ok(InsertResult::DigestConflict {
                            digest: certificate.digest,
                        })
                    } else {
                        Ok(InsertResult::IdCollision {
                            certificate_id: certificate.certificate_id,
                        })
                    }
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn find_by_digest(&self, digest: &Digest) -> Result<Option<Certificate>> {
        let digest = digest.clone();

        self.with_conn(move |conn| {
            conn.query_row(
                &format!("{SELECT_CERTIFICATE} WHERE video_hash = ?1"),
                params![digest.as_str()],
                row_to_certificate,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn find_by_id(&self, certificate_id: &CertificateId) -> Result<Option<Certificate>> {
        let certificate_id = certificate_id.clone();

        self.with_conn(move |conn| {
            conn.query_row(
                &format!("{SELECT_CERTIFICATE} WHERE certificate_id = ?1"),
                params![certificate_id.as_str()],
                row_to_certificate,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let total: i64 =
                conn.query_row("SELECT COUNT(*) FROM certificates", [], |row| row.get(0))?;
            u64::try_from(total)
                .map_err(|_| StoreError::InvalidData(format!("negative row count: {}", total)))
        })
        .await
    }
}
