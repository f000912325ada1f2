//! SkillPortal RPC server: JSON-RPC over stdin/stdout for the portal front-end.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.toggle", "params":{"id":"learning-ba"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Events:   {"event":"sync.status", "status":{...}}, emitted whenever sync status changes

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::{error, info};

use skillportal::app::{remote_store_from_settings, App};
use skillportal::logging;
use skillportal::managers::bookmark_sync::BookmarkSyncTrait;
use skillportal::platform;
use skillportal::rpc_handler::{handle_method, status_json};
use skillportal::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

/// Writes one protocol line. Sync status events arrive from runtime workers,
/// so every line goes out under the stdout lock.
fn emit(value: &Value) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{}", value);
    let _ = out.flush();
}

fn main() {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let mut settings_engine = SettingsEngine::new(None);
    let settings_error = settings_engine.load().err();
    logging::init(&settings_engine.get_settings().logging.filter);
    if let Some(e) = settings_error {
        error!(error = %e, "settings unreadable, using defaults");
    }

    let data_dir = platform::get_data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        error!(dir = %data_dir.display(), error = %e, "cannot create data directory");
    }
    let db_path = data_dir.join(&settings_engine.get_settings().storage.database_file);
    let remote = remote_store_from_settings(settings_engine.get_settings());

    let app = match App::with_remote(
        &db_path.to_string_lossy(),
        settings_engine,
        remote,
        runtime.handle().clone(),
    ) {
        Ok(app) => app,
        Err(e) => {
            error!(db = %db_path.display(), error = %e, "failed to initialize SkillPortal");
            std::process::exit(1);
        }
    };

    app.bookmarks
        .subscribe_sync_status(Box::new(|status| {
            emit(&json!({"event": "sync.status", "status": status_json(status)}));
        }))
        .detach();
    let app = Mutex::new(app);

    info!(db = %db_path.display(), "rpc server ready");
    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut rate_limiter = RateLimiter::new(200);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            emit(&json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&response);
    }

    if let Ok(mut a) = app.lock() {
        a.shutdown();
    }
    info!("stdin closed, shutting down");
}
