// SkillPortal state managers
// Managers own mutable session state: the signed-in account, the bookmark set and its sync status.

pub mod account_manager;
pub mod bookmark_sync;
pub mod status_signal;
