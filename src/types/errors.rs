use std::fmt;

// === StorageError ===

/// Errors raised by the local durable store.
///
/// The store's public `read`/`write` swallow these; they surface only through
/// the strict `try_*` variants.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed (missing table, locked file, disk full).
    DatabaseError(String),
    /// Persisted value could not be encoded or decoded as JSON.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === RemoteError ===

/// Errors reported by a remote bookmark store.
///
/// `Network` and `Rejected` display their message verbatim since it is shown
/// to the user as the sync error.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The request never reached the store or the connection dropped.
    Network(String),
    /// The store answered but refused the write.
    Rejected(String),
    /// No answer within the configured timeout (milliseconds).
    Timeout(u64),
    /// The write task was cancelled before it completed.
    Aborted,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Network(msg) => write!(f, "{}", msg),
            RemoteError::Rejected(msg) => write!(f, "{}", msg),
            RemoteError::Timeout(ms) => write!(f, "Sync timed out after {} ms", ms),
            RemoteError::Aborted => write!(f, "Sync aborted"),
        }
    }
}

impl std::error::Error for RemoteError {}

// === CatalogError ===

/// Errors related to loading the content catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    IoError(String),
    /// The catalog payload is not a valid item list.
    ParseError(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::IoError(msg) => write!(f, "Catalog I/O error: {}", msg),
            CatalogError::ParseError(msg) => write!(f, "Catalog parse error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === FacetError ===

/// Raised when a string does not name a known filter facet.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetError(pub String);

impl fmt::Display for FacetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown filter facet: {}", self.0)
    }
}

impl std::error::Error for FacetError {}
