// SkillPortal shared type definitions
// Each submodule defines plain data used across engines, services and the RPC layer.

pub mod account;
pub mod bookmark;
pub mod catalog;
pub mod errors;
pub mod facet;
pub mod settings;
pub mod sync_status;
