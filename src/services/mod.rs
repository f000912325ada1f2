// SkillPortal services
// Services provide the portal's core functionality: local and remote persistence,
// the content catalog, card filtering, viewport reveals and settings.

pub mod catalog;
pub mod filter_engine;
pub mod local_store;
pub mod remote_store;
pub mod reveal_scheduler;
pub mod settings_engine;
