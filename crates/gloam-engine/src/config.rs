//! Host configuration. Loaded from `gloam.ron` at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coords::CanvasSize;

/// Settings shared by the HUD and transition layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Canvas width in pixels.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: i32,
    /// Canvas height in pixels.
    #[serde(default = "default_canvas_height")]
    pub canvas_height: i32,
    /// Distance kept between anchored HUD elements and the canvas edge.
    #[serde(default = "default_hud_margin")]
    pub hud_margin: i32,
    /// Default transition tick period in milliseconds.
    #[serde(default = "default_transition_tick_ms")]
    pub transition_tick_ms: u32,
    /// `env_logger` filter; `RUST_LOG` applies when unset.
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_canvas_width() -> i32 {
    1024
}
fn default_canvas_height() -> i32 {
    768
}
fn default_hud_margin() -> i32 {
    16
}
fn default_transition_tick_ms() -> u32 {
    50
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            hud_margin: default_hud_margin(),
            transition_tick_ms: default_transition_tick_ms(),
            log_filter: None,
        }
    }
}

impl HostConfig {
    /// Parses RON text. Missing fields take their defaults.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Loads config from `path`. If the file is missing or invalid, returns defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match Self::from_ron(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(e) => log::debug!("No config at {:?} ({}), using defaults", path, e),
        }
        Self::default()
    }

    #[inline]
    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let c = HostConfig::from_ron("(canvas_width: 640)").unwrap();
        assert_eq!(c.canvas_width, 640);
        assert_eq!(c.canvas_height, 768);
        assert_eq!(c.hud_margin, 16);
        assert_eq!(c.transition_tick_ms, 50);
        assert_eq!(c.log_filter, None);
    }

    #[test]
    fn log_filter_is_optional_string() {
        let c = HostConfig::from_ron(r#"(log_filter: Some("debug"))"#).unwrap();
        assert_eq!(c.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let c = HostConfig::load(Path::new("/nonexistent/gloam.ron"));
        assert_eq!(c, HostConfig::default());
        assert_eq!(c.canvas_size(), CanvasSize::new(1024, 768));
    }
}
