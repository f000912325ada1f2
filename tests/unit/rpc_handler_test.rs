//! Unit tests for the RPC handler: the JSON-RPC methods dispatched by `handle_method`.
//!
//! These go through the same code path as the `skillportal-rpc` binary, with a
//! temporary on-disk database and settings file. Pushes run on a background
//! runtime owned by the fixture.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::runtime::Runtime;

use skillportal::app::App;
use skillportal::rpc_handler::handle_method;

struct Fixture {
    app: Mutex<App>,
    runtime: Runtime,
    _tmp: TempDir,
}

/// Create a fresh App backed by a temp directory.
fn setup() -> Fixture {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let db_path = tmp.path().join("test.db");
    let settings_path = tmp.path().join("settings.json");
    let runtime = Runtime::new().expect("Failed to start runtime");
    let app = App::new(
        db_path.to_str().unwrap(),
        Some(settings_path.to_string_lossy().to_string()),
        runtime.handle().clone(),
    )
    .expect("Failed to init App");
    Fixture {
        app: Mutex::new(app),
        runtime,
        _tmp: tmp,
    }
}

fn call(fx: &Fixture, method: &str, params: Value) -> Value {
    handle_method(&fx.app, method, &params).unwrap()
}

fn render_learning(fx: &Fixture) {
    call(
        fx,
        "catalog.render",
        json!({
            "section": "learning",
            "items": [
                {"id": "learning-ba", "title": "Process Modelling", "kind": "learning_card", "role_tags": ["ba"]},
                {"id": "learning-da", "title": "Pandas Basics", "kind": "learning_card", "role_tags": ["da"]},
                {"id": "learning-general", "title": "Portfolio Tips", "kind": "learning_card"}
            ]
        }),
    );
}

fn wait_for_phase(fx: &Fixture, phase: &str) -> Value {
    for _ in 0..100 {
        let status = call(fx, "sync.status", json!({}));
        if status["phase"] == phase {
            return status;
        }
        fx.runtime.block_on(tokio::time::sleep(Duration::from_millis(10)));
    }
    panic!("sync status never reached {}", phase);
}

// ─── Ping ───

#[test]
fn test_ping() {
    let fx = setup();
    assert_eq!(call(&fx, "ping", json!({})), json!({"pong": true}));
}

#[test]
fn test_unknown_method_returns_error() {
    let fx = setup();
    let res = handle_method(&fx.app, "nonexistent.method", &json!({}));
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Accounts ───

#[test]
fn test_login_and_current() {
    let fx = setup();
    let current = call(&fx, "account.current", json!({}));
    assert!(current["account_id"].is_null());

    call(&fx, "account.login", json!({"account_id": "u1", "display_name": "Ada"}));
    let current = call(&fx, "account.current", json!({}));
    assert_eq!(current["account_id"], "u1");
    assert_eq!(current["display_name"], "Ada");

    let out = call(&fx, "account.logout", json!({}));
    assert_eq!(out["account_id"], "u1");
    assert!(call(&fx, "account.current", json!({}))["account_id"].is_null());
}

#[test]
fn test_login_requires_account_id() {
    let fx = setup();
    assert!(handle_method(&fx.app, "account.login", &json!({})).is_err());
    assert!(handle_method(&fx.app, "account.login", &json!({"account_id": "  "})).is_err());
}

// ─── Bookmarks ───

#[test]
fn test_guest_toggle_is_local_only() {
    let fx = setup();
    let res = call(&fx, "bookmark.toggle", json!({"id": "learning-ba"}));
    assert_eq!(res["bookmarked"], true);
    assert_eq!(res["syncing"], false);

    assert_eq!(call(&fx, "bookmark.is", json!({"id": "learning-ba"}))["bookmarked"], true);
    let status = call(&fx, "sync.status", json!({}));
    assert_eq!(status["phase"], "idle");
    assert!(status["badge"].is_null());
    assert_eq!(call(&fx, "bookmark.retry", json!({}))["scheduled"], false);
}

#[test]
fn test_toggle_twice_and_revisions() {
    let fx = setup();
    call(&fx, "account.login", json!({"account_id": "u1"}));

    let first = call(&fx, "bookmark.toggle", json!({"id": "cert-aws"}));
    let second = call(&fx, "bookmark.toggle", json!({"id": "cert-aws"}));
    assert_eq!(first["bookmarked"], true);
    assert_eq!(second["bookmarked"], false);
    assert!(second["revision"].as_u64() > first["revision"].as_u64());
    assert_eq!(call(&fx, "bookmark.is", json!({"id": "cert-aws"}))["bookmarked"], false);
}

#[test]
fn test_toggle_requires_id() {
    let fx = setup();
    assert!(handle_method(&fx.app, "bookmark.toggle", &json!({})).is_err());
    assert!(handle_method(&fx.app, "bookmark.toggle", &json!({"id": ""})).is_err());
}

#[test]
fn test_signed_in_toggle_reaches_synced() {
    let fx = setup();
    call(&fx, "account.login", json!({"account_id": "u1"}));
    let res = call(&fx, "bookmark.toggle", json!({"id": "learning-ba"}));
    assert_eq!(res["syncing"], true);

    let status = wait_for_phase(&fx, "synced");
    assert_eq!(status["badge"], "Synced");
    assert_eq!(status["isSyncing"], false);
    assert!(status["error"].is_null());
    assert!(status["lastSyncTime"].is_i64());
}

#[test]
fn test_bookmarks_follow_account() {
    let fx = setup();
    call(&fx, "account.login", json!({"account_id": "u1"}));
    call(&fx, "bookmark.toggle", json!({"id": "learning-ba"}));

    call(&fx, "account.login", json!({"account_id": "u2"}));
    assert_eq!(call(&fx, "bookmark.is", json!({"id": "learning-ba"}))["bookmarked"], false);

    call(&fx, "account.login", json!({"account_id": "u1"}));
    assert_eq!(call(&fx, "bookmark.is", json!({"id": "learning-ba"}))["bookmarked"], true);
}

#[test]
fn test_bookmark_list_resolves_against_catalog() {
    let fx = setup();
    render_learning(&fx);
    call(&fx, "bookmark.toggle", json!({"id": "learning-da"}));
    call(&fx, "bookmark.toggle", json!({"id": "retired-course"}));

    let list = call(&fx, "bookmark.list", json!({}));
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "learning-da");
    assert_eq!(items[0]["found"], true);
    assert_eq!(items[0]["title"], "Pandas Basics");
    assert_eq!(items[1]["id"], "retired-course");
    assert_eq!(items[1]["found"], false);
    assert_eq!(items[1]["title"], "Saved item (unavailable)");
}

#[test]
fn test_bookmark_list_follows_section_refetch() {
    let fx = setup();
    render_learning(&fx);
    call(&fx, "bookmark.toggle", json!({"id": "learning-da"}));

    call(
        &fx,
        "catalog.render",
        json!({
            "section": "learning",
            "items": [
                {"id": "learning-ba", "title": "Process Modelling", "kind": "learning_card", "role_tags": ["ba"]}
            ]
        }),
    );

    let list = call(&fx, "bookmark.list", json!({}));
    assert_eq!(list["items"][0]["id"], "learning-da");
    assert_eq!(list["items"][0]["found"], false);
}

#[test]
fn test_account_named_guest_starts_empty() {
    let fx = setup();
    call(&fx, "bookmark.toggle", json!({"id": "learning-ba"}));

    let login = call(&fx, "account.login", json!({"account_id": "guest"}));
    assert_eq!(login["bookmarks"], 0);
    assert_eq!(call(&fx, "bookmark.is", json!({"id": "learning-ba"}))["bookmarked"], false);

    call(&fx, "account.logout", json!({}));
    assert_eq!(call(&fx, "bookmark.is", json!({"id": "learning-ba"}))["bookmarked"], true);
}

// ─── Filter & reveal ───

#[test]
fn test_filter_apply_and_commit() {
    let fx = setup();
    render_learning(&fx);

    let res = call(&fx, "filter.apply", json!({"facet": "ba"}));
    assert_eq!(res["facet"], "ba");
    assert_eq!(res["shown"], json!(["learning-ba", "learning-general"]));
    assert_eq!(res["hidden"], json!(["learning-da"]));
    assert_eq!(res["empty"], false);
    assert_eq!(res["show_delay_ms"], 50);

    let generation = res["generation"].clone();
    assert_eq!(call(&fx, "filter.commit", json!({"generation": generation}))["marked"], 2);
    assert_eq!(call(&fx, "filter.commit", json!({"generation": 0}))["marked"], 0);

    let state = call(&fx, "view.state", json!({}));
    assert_eq!(state["facet"], "ba");
    let da = state["cards"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["item_id"] == "learning-da")
        .unwrap();
    assert_eq!(da["markers"], json!(["hidden"]));
    assert_eq!(state["page_height"], json!(240.0));
}

#[test]
fn test_filter_unknown_facet() {
    let fx = setup();
    let err = handle_method(&fx.app, "filter.apply", &json!({"facet": "devops"})).unwrap_err();
    assert!(err.contains("Unknown filter facet"));
}

#[test]
fn test_late_render_respects_active_facet() {
    let fx = setup();
    call(&fx, "filter.apply", json!({"facet": "da"}));
    render_learning(&fx);

    let state = call(&fx, "view.state", json!({}));
    let hidden: Vec<&str> = state["cards"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["markers"].as_array().unwrap().contains(&json!("hidden")))
        .map(|c| c["item_id"].as_str().unwrap())
        .collect();
    assert_eq!(hidden, vec!["learning-ba"]);
}

#[test]
fn test_reveal_viewport_is_one_shot() {
    let fx = setup();
    render_learning(&fx);

    let res = call(&fx, "reveal.viewport", json!({"x": 0, "y": 0, "width": 1280, "height": 720}));
    assert_eq!(
        res["revealed"],
        json!(["learning-ba", "learning-da", "learning-general"])
    );
    assert_eq!(res["watching"], 0);

    let again = call(&fx, "reveal.viewport", json!({"y": 0, "width": 1280, "height": 720}));
    assert_eq!(again["revealed"], json!([]));
}

#[test]
fn test_reveal_viewport_requires_geometry() {
    let fx = setup();
    assert!(handle_method(&fx.app, "reveal.viewport", &json!({"y": 0})).is_err());
}

// ─── Settings ───

#[test]
fn test_settings_get_and_set() {
    let fx = setup();
    let settings = call(&fx, "settings.get", json!({}));
    assert_eq!(settings["filter"]["show_delay_ms"], 50);

    call(&fx, "settings.set", json!({"key": "filter.show_delay_ms", "value": 80}));
    let settings = call(&fx, "settings.get", json!({}));
    assert_eq!(settings["filter"]["show_delay_ms"], 80);

    assert!(handle_method(&fx.app, "settings.set", &json!({"key": "nope", "value": 1})).is_err());
    assert!(handle_method(&fx.app, "settings.set", &json!({"key": "filter.show_delay_ms"})).is_err());
}
