//! Pager configuration
//!
//! Every option can be set programmatically or loaded from TOML. Missing
//! keys take their documented defaults:
//!
//! ```toml
//! orientation = "horizontal"
//! page_margin = 16.0
//! estimated_size = 390.0
//! lazy = true
//! lazy_page_limit = 1
//!
//! [scroll_offset]
//! mode = "bounce"
//! resistance_factor = 0.7
//! threshold = 0.3
//! ```
//!
//! Leaving out `estimated_size` defers page rendering until the container
//! reports its first real size.

use std::fs;
use std::path::Path;

use pagekit_animation::SpringConfig;
use pagekit_gesture::{ActivationConfig, HitSlop, Orientation};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::interpolator::BounceConfig;

/// Pager options
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PagerConfig {
    #[serde(default)]
    pub orientation: Orientation,
    /// Gap between pages, added to the measured size to form the page size
    #[serde(default)]
    pub page_margin: f32,
    #[serde(default)]
    pub initial_page: usize,
    #[serde(default = "default_true")]
    pub scroll_enabled: bool,
    /// How much of the next page must be visible before it becomes active
    #[serde(default = "default_page_activation_threshold")]
    pub page_activation_threshold: f32,
    /// Release velocity that always advances a page, in units per second
    #[serde(default = "default_pan_velocity_threshold")]
    pub pan_velocity_threshold: f32,
    #[serde(default = "default_gesture_direction_tolerance_deg")]
    pub gesture_direction_tolerance_deg: f32,
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f32,
    #[serde(default)]
    pub fail_activation_when_exceeding_start_edge: bool,
    #[serde(default)]
    pub fail_activation_when_exceeding_end_edge: bool,
    #[serde(default)]
    pub hit_slop: HitSlop,
    #[serde(default)]
    pub block_parent_scrollable_activation: bool,
    /// Defer mounting page content until it nears the active page
    #[serde(default)]
    pub lazy: bool,
    #[serde(default = "default_lazy_page_limit")]
    pub lazy_page_limit: usize,
    #[serde(default)]
    pub track_onscreen: bool,
    #[serde(default)]
    pub track_onscreen_page_limit: usize,
    /// Container size used before the first measurement; `None` defers rendering
    #[serde(default)]
    pub estimated_size: Option<f32>,
    #[serde(default = "default_true")]
    pub remove_clipped_pages: bool,
    /// Keep the active page's key active when children change
    #[serde(default)]
    pub hold_current_page_on_children_update: bool,
    /// Delay after a settle before clipped pages may be detached again
    #[serde(default = "default_clipping_grace_ms")]
    pub clipping_grace_ms: f32,
    /// Fade-in duration of freshly mounted pages; 0 disables the fade
    #[serde(default = "default_mount_fade_ms")]
    pub mount_fade_ms: f32,
    #[serde(default)]
    pub scroll_offset: ScrollOffsetMode,
    #[serde(default)]
    pub page_style: PageStyleMode,
    #[serde(default)]
    pub scroll_to_page_spring: ScrollToPageSpring,
}

fn default_true() -> bool {
    true
}

fn default_page_activation_threshold() -> f32 {
    0.8
}

fn default_pan_velocity_threshold() -> f32 {
    500.0
}

fn default_gesture_direction_tolerance_deg() -> f32 {
    45.0
}

fn default_activation_distance() -> f32 {
    10.0
}

fn default_lazy_page_limit() -> usize {
    1
}

fn default_clipping_grace_ms() -> f32 {
    5000.0
}

fn default_mount_fade_ms() -> f32 {
    200.0
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            page_margin: 0.0,
            initial_page: 0,
            scroll_enabled: true,
            page_activation_threshold: default_page_activation_threshold(),
            pan_velocity_threshold: default_pan_velocity_threshold(),
            gesture_direction_tolerance_deg: default_gesture_direction_tolerance_deg(),
            activation_distance: default_activation_distance(),
            fail_activation_when_exceeding_start_edge: false,
            fail_activation_when_exceeding_end_edge: false,
            hit_slop: HitSlop::default(),
            block_parent_scrollable_activation: false,
            lazy: false,
            lazy_page_limit: default_lazy_page_limit(),
            track_onscreen: false,
            track_onscreen_page_limit: 0,
            estimated_size: None,
            remove_clipped_pages: true,
            hold_current_page_on_children_update: false,
            clipping_grace_ms: default_clipping_grace_ms(),
            mount_fade_ms: default_mount_fade_ms(),
            scroll_offset: ScrollOffsetMode::default(),
            page_style: PageStyleMode::default(),
            scroll_to_page_spring: ScrollToPageSpring::default(),
        }
    }
}

impl PagerConfig {
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_initial_page(mut self, page: usize) -> Self {
        self.initial_page = page;
        self
    }

    pub fn with_page_margin(mut self, margin: f32) -> Self {
        self.page_margin = margin;
        self
    }

    pub fn with_estimated_size(mut self, size: Option<f32>) -> Self {
        self.estimated_size = size;
        self
    }

    /// Enable lazy mounting with the given window
    pub fn with_lazy(mut self, page_limit: usize) -> Self {
        self.lazy = true;
        self.lazy_page_limit = page_limit;
        self
    }

    /// Enable onscreen tracking with the given window
    pub fn with_track_onscreen(mut self, page_limit: usize) -> Self {
        self.track_onscreen = true;
        self.track_onscreen_page_limit = page_limit;
        self
    }

    pub fn with_bounce(mut self, bounce: BounceConfig) -> Self {
        self.scroll_offset = ScrollOffsetMode::Bounce(bounce);
        self
    }

    pub fn with_hold_current_page(mut self, hold: bool) -> Self {
        self.hold_current_page_on_children_update = hold;
        self
    }

    /// Gesture claim thresholds derived from this config
    pub fn activation(&self) -> ActivationConfig {
        ActivationConfig {
            activation_distance: self.activation_distance,
            direction_tolerance_deg: self.gesture_direction_tolerance_deg,
            fail_on_start_edge: self.fail_activation_when_exceeding_start_edge,
            fail_on_end_edge: self.fail_activation_when_exceeding_end_edge,
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        unit_range("page_activation_threshold", self.page_activation_threshold)?;
        non_negative("page_margin", self.page_margin)?;
        non_negative("pan_velocity_threshold", self.pan_velocity_threshold)?;
        non_negative("activation_distance", self.activation_distance)?;
        non_negative("clipping_grace_ms", self.clipping_grace_ms)?;
        non_negative("mount_fade_ms", self.mount_fade_ms)?;
        if let Some(size) = self.estimated_size {
            non_negative("estimated_size", size)?;
        }

        let tolerance = self.gesture_direction_tolerance_deg;
        if !(0.0..=90.0).contains(&tolerance) {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }

        if let ScrollOffsetMode::Bounce(bounce) = &self.scroll_offset {
            unit_range("scroll_offset.resistance_factor", bounce.resistance_factor)?;
            non_negative("scroll_offset.threshold", bounce.threshold)?;
        }

        self.scroll_to_page_spring.validate()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PagerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Mapping from raw scroll position to display position
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScrollOffsetMode {
    /// Clamp into the page range, no bounce
    #[default]
    Clamp,
    /// Resistance-dampened overscroll
    Bounce(BounceConfig),
}

/// Built-in page style interpolators
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStyleMode {
    /// Pages ride the track without extra transform
    #[default]
    Slide,
    /// Pages stack like cards
    CardStack,
}

/// Spring used to settle on a page after a drag or `set_page`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollToPageSpring {
    #[serde(default = "default_spring_stiffness")]
    pub stiffness: f32,
    #[serde(default = "default_spring_damping")]
    pub damping: f32,
    /// Mass when the requested page is inside the page range
    #[serde(default = "default_spring_mass")]
    pub mass: f32,
    /// Mass when bouncing back from an out-of-range request
    #[serde(default = "default_spring_overscroll_mass")]
    pub overscroll_mass: f32,
}

fn default_spring_stiffness() -> f32 {
    SpringConfig::page_settle().stiffness
}

fn default_spring_damping() -> f32 {
    SpringConfig::page_settle().damping
}

fn default_spring_mass() -> f32 {
    SpringConfig::page_settle().mass
}

fn default_spring_overscroll_mass() -> f32 {
    SpringConfig::overscroll_settle().mass
}

impl Default for ScrollToPageSpring {
    fn default() -> Self {
        Self {
            stiffness: default_spring_stiffness(),
            damping: default_spring_damping(),
            mass: default_spring_mass(),
            overscroll_mass: default_spring_overscroll_mass(),
        }
    }
}

impl ScrollToPageSpring {
    pub fn config_for(&self, is_overscroll: bool) -> SpringConfig {
        let mass = if is_overscroll {
            self.overscroll_mass
        } else {
            self.mass
        };
        SpringConfig::new(self.stiffness, self.damping, mass)
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("stiffness", self.stiffness),
            ("mass", self.mass),
            ("overscroll_mass", self.overscroll_mass),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSpring { field, value });
            }
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(ConfigError::InvalidSpring {
                field: "damping",
                value: self.damping,
            });
        }
        Ok(())
    }
}
