//! Gesture script files
//!
//! A script describes a pager and a sequence of steps to feed it:
//!
//! ```toml
//! pages = 4
//! width = 390.0
//! height = 844.0
//!
//! [[steps]]
//! action = "touch_down"
//! x = 300.0
//! y = 400.0
//!
//! [[steps]]
//! action = "pan"
//! x = -240.0
//!
//! [[steps]]
//! action = "release"
//! x = -240.0
//! velocity_x = -900.0
//!
//! [[steps]]
//! action = "settle"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use pagekit_gesture::{GestureInput, Point};
use pagekit_pager::PageKey;

/// Script file contents
#[derive(Debug, Deserialize, Serialize)]
pub struct Script {
    /// Number of index-keyed pages, ignored when `keys` is set
    #[serde(default = "default_pages")]
    pub pages: usize,
    /// Explicit page keys
    #[serde(default)]
    pub keys: Option<Vec<String>>,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Pager configuration file, relative to the script
    #[serde(default)]
    pub config: Option<PathBuf>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_pages() -> usize {
    3
}

fn default_width() -> f32 {
    390.0
}

fn default_height() -> f32 {
    844.0
}

fn default_fps() -> u32 {
    60
}

/// One scripted action
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    TouchDown {
        x: f32,
        y: f32,
    },
    /// Total translation since touch-down
    Pan {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    Release {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default)]
        velocity_x: f32,
        #[serde(default)]
        velocity_y: f32,
    },
    Cancel,
    SetPage {
        page: usize,
        #[serde(default = "default_animated")]
        animated: bool,
    },
    SetScrollEnabled {
        enabled: bool,
    },
    /// Let time pass
    Wait {
        ms: f32,
    },
    /// Run frames until no animation is left
    Settle,
    Resize {
        width: f32,
        height: f32,
    },
    Children {
        keys: Vec<String>,
    },
}

fn default_animated() -> bool {
    true
}

impl Step {
    /// Gesture input for touch steps
    pub fn gesture(&self) -> Option<GestureInput> {
        match *self {
            Step::TouchDown { x, y } => Some(GestureInput::TouchDown {
                position: Point::new(x, y),
            }),
            Step::Pan { x, y } => Some(GestureInput::Pan {
                translation: Point::new(x, y),
            }),
            Step::Release {
                x,
                y,
                velocity_x,
                velocity_y,
            } => Some(GestureInput::Release {
                translation: Point::new(x, y),
                velocity: Point::new(velocity_x, velocity_y),
            }),
            Step::Cancel => Some(GestureInput::Cancel),
            _ => None,
        }
    }
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut script: Script = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if let (Some(config), Some(dir)) = (script.config.as_mut(), path.parent()) {
            if config.is_relative() {
                *config = dir.join(&*config);
            }
        }
        Ok(script)
    }

    pub fn page_keys(&self) -> Vec<PageKey> {
        match &self.keys {
            Some(keys) => keys.iter().map(|key| PageKey::new(key.as_str())).collect(),
            None => PageKey::indexed(self.pages),
        }
    }

    /// Seconds per simulated frame
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}
