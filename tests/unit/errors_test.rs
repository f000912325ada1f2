use skillportal::types::errors::*;

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::DatabaseError("no such table: kv_store".to_string()).to_string(),
        "Storage database error: no such table: kv_store"
    );
    assert_eq!(
        StorageError::SerializationError("expected value".to_string()).to_string(),
        "Storage serialization error: expected value"
    );
}

#[test]
fn storage_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(StorageError::DatabaseError("x".to_string()));
    assert!(err.source().is_none());
}

// === RemoteError Tests ===

#[test]
fn remote_error_messages_are_shown_verbatim() {
    assert_eq!(RemoteError::Network("network down".to_string()).to_string(), "network down");
    assert_eq!(
        RemoteError::Rejected("Remote store rejected write (403 Forbidden)".to_string()).to_string(),
        "Remote store rejected write (403 Forbidden)"
    );
}

#[test]
fn remote_error_timeout_and_abort_display() {
    assert_eq!(RemoteError::Timeout(1500).to_string(), "Sync timed out after 1500 ms");
    assert_eq!(RemoteError::Aborted.to_string(), "Sync aborted");
}

#[test]
fn remote_error_is_comparable() {
    assert_eq!(RemoteError::Timeout(10), RemoteError::Timeout(10));
    assert_ne!(
        RemoteError::Network("a".to_string()),
        RemoteError::Rejected("a".to_string())
    );
}

// === CatalogError Tests ===

#[test]
fn catalog_error_display_variants() {
    assert_eq!(
        CatalogError::IoError("catalog.json: not found".to_string()).to_string(),
        "Catalog I/O error: catalog.json: not found"
    );
    assert_eq!(
        CatalogError::ParseError("missing field `kind`".to_string()).to_string(),
        "Catalog parse error: missing field `kind`"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
    assert_eq!(
        SettingsError::SerializationError("bad json".to_string()).to_string(),
        "Settings serialization error: bad json"
    );
    assert_eq!(
        SettingsError::InvalidKey("nope".to_string()).to_string(),
        "Invalid settings key: nope"
    );
    assert_eq!(
        SettingsError::InvalidValue("wrong type".to_string()).to_string(),
        "Invalid settings value: wrong type"
    );
}

// === FacetError Tests ===

#[test]
fn facet_error_display() {
    assert_eq!(FacetError("devops".to_string()).to_string(), "Unknown filter facet: devops");
}
