use serde::{Deserialize, Serialize};

/// Local store key for the cached profile of an account.
pub const PROFILE_KEY: &str = "profile";

/// Local store namespace for a signed-out visitor's bookmarks.
///
/// Account ids are never empty, so no signed-in account can share it.
pub const GUEST_ACCOUNT: &str = "";

/// Namespace under which `account_id`'s local data is kept.
pub fn storage_namespace(account_id: Option<&str>) -> &str {
    account_id.unwrap_or(GUEST_ACCOUNT)
}

/// Profile data cached locally for the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub account_id: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
}
