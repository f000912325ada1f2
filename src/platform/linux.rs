// SkillPortal platform paths for Linux
// Config: ~/.config/skillportal
// Data:   ~/.local/share/skillportal

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/skillportal` if set, otherwise `~/.config/skillportal`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("skillportal"),
        _ => home_dir().join(".config").join("skillportal"),
    }
}

/// Uses `$XDG_DATA_HOME/skillportal` if set, otherwise `~/.local/share/skillportal`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("skillportal"),
        _ => home_dir().join(".local").join("share").join("skillportal"),
    }
}
