//! RPC method handler for the SkillPortal JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches one call to the engines held by [`App`].

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::account_manager::AccountProvider;
use crate::managers::bookmark_sync::BookmarkSyncTrait;
use crate::services::filter_engine::FilterOutcome;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::account::AccountProfile;
use crate::types::catalog::CatalogItem;
use crate::types::facet::FilterFacet;
use crate::types::sync_status::SyncStatus;
use crate::view::{NodeId, Rect};

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn f64_param(params: &Value, key: &str) -> Result<f64, String> {
    params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| format!("missing {}", key))
}

/// Status as sent to UI surfaces, with the derived phase and badge text.
pub fn status_json(status: &SyncStatus) -> Value {
    json!({
        "isSyncing": status.is_syncing,
        "error": status.error,
        "lastSyncTime": status.last_sync_time,
        "phase": status.phase(),
        "badge": status.badge_label(),
    })
}

fn item_ids(app: &App, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|&n| app.view.card(n).map(|c| c.item_id.clone()))
        .collect()
}

fn filter_json(app: &App, outcome: &FilterOutcome) -> Value {
    json!({
        "facet": outcome.facet,
        "generation": outcome.generation,
        "shown": item_ids(app, &outcome.shown),
        "hidden": item_ids(app, &outcome.hidden),
        "empty": outcome.is_empty(),
        "show_delay_ms": app.filter.show_delay().as_millis() as u64,
    })
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Accounts ───
        "account.login" => {
            let account_id = str_param(params, "account_id")?.trim();
            if account_id.is_empty() {
                return Err("account_id must not be empty".to_string());
            }
            let display_name = params
                .get("display_name")
                .and_then(|v| v.as_str())
                .unwrap_or(account_id);
            let email = params.get("email").and_then(|v| v.as_str()).map(str::to_string);
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.login(AccountProfile {
                account_id: account_id.to_string(),
                display_name: display_name.to_string(),
                email,
            });
            Ok(json!({"account_id": account_id, "bookmarks": a.bookmarks.bookmark_count()}))
        }
        "account.logout" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let previous = a.logout().map(|p| p.account_id);
            Ok(json!({"ok": true, "account_id": previous}))
        }
        "account.current" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let profile = a.accounts.current_profile();
            Ok(json!({
                "account_id": a.accounts.current_account_id(),
                "display_name": profile.map(|p| p.display_name.clone()),
            }))
        }

        // ─── Bookmarks ───
        "bookmark.toggle" => {
            let id = str_param(params, "id")?;
            if id.trim().is_empty() {
                return Err("id must not be empty".to_string());
            }
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let receipt = a.bookmarks.toggle_bookmark(id);
            Ok(json!({
                "id": receipt.id,
                "bookmarked": receipt.bookmarked,
                "revision": receipt.revision,
                "syncing": receipt.sync.is_some(),
            }))
        }
        "bookmark.is" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"id": id, "bookmarked": a.is_bookmarked(id)}))
        }
        "bookmark.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let items: Vec<Value> = a
                .resolved_bookmarks()
                .iter()
                .map(|lookup| {
                    json!({
                        "id": lookup.id(),
                        "found": lookup.is_found(),
                        "title": lookup.display_title(),
                    })
                })
                .collect();
            Ok(json!({"items": items}))
        }
        "bookmark.retry" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let scheduled = a.bookmarks.retry_sync().is_some();
            Ok(json!({"scheduled": scheduled}))
        }
        "sync.status" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(status_json(&a.bookmarks.get_sync_status()))
        }

        // ─── Catalog & view ───
        "catalog.render" => {
            let section = str_param(params, "section")?;
            let filterable = params.get("filterable").and_then(|v| v.as_bool()).unwrap_or(true);
            let raw_items = params.get("items").cloned().ok_or("missing items")?;
            let items: Vec<CatalogItem> =
                serde_json::from_value(raw_items).map_err(|e| format!("invalid items: {}", e))?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let nodes = a.render_section(section, filterable, items);
            Ok(json!({"section": section, "rendered": nodes.len(), "cards": a.view.card_count()}))
        }
        "filter.apply" => {
            let facet = str_param(params, "facet")?
                .parse::<FilterFacet>()
                .map_err(|e| e.to_string())?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let outcome = a.apply_filter(facet);
            Ok(filter_json(&a, &outcome))
        }
        "filter.commit" => {
            let generation = params
                .get("generation")
                .and_then(|v| v.as_u64())
                .ok_or("missing generation")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let marked = a.commit_filter(generation);
            Ok(json!({"marked": marked}))
        }
        "reveal.viewport" => {
            let viewport = Rect::new(
                f64_param(params, "x").unwrap_or(0.0),
                f64_param(params, "y")?,
                f64_param(params, "width")?,
                f64_param(params, "height")?,
            );
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let revealed = a.on_viewport(viewport);
            Ok(json!({"revealed": revealed, "watching": a.reveal.watched_count()}))
        }
        "view.state" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let cards: Vec<Value> = a
                .view
                .live_nodes()
                .map(|(_, card)| {
                    json!({
                        "item_id": card.item_id,
                        "markers": card.markers,
                        "bounds": card.bounds,
                    })
                })
                .collect();
            Ok(json!({
                "facet": a.filter.active_facet(),
                "page_height": a.view.page_height(),
                "cards": cards,
            }))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
