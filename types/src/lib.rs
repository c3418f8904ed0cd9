//! Shared egress and configuration types for bossmod
//!
//! This crate contains serializable types that are shared between the encounter
//! engine (bossmod-core) and whatever renders its output (overlay, web view, logs).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Color Categories
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color as [r, g, b, a] bytes
pub type Color = [u8; 4];

/// Semantic color class attached to every render primitive.
///
/// The engine only classifies; the renderer decides what each category looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCategory {
    /// Area that will be hit by an attack
    #[default]
    Danger,
    /// Spot a player should move to
    Safe,
    /// Area outside of any predicted attack
    SafeFromAoe,
    /// Party member with nothing special going on
    GenericPlayer,
    /// Party member relevant to the current mechanic
    InterestingPlayer,
    /// Arena border
    Border,
    /// Hostile actor
    Enemy,
    /// The player the output is generated for
    LocalPlayer,
}

impl ColorCategory {
    /// Default RGBA used when the renderer has no override configured
    pub fn default_color(&self) -> Color {
        match self {
            ColorCategory::Danger => category_colors::DANGER,
            ColorCategory::Safe => category_colors::SAFE,
            ColorCategory::SafeFromAoe => category_colors::SAFE_FROM_AOE,
            ColorCategory::GenericPlayer => category_colors::GENERIC_PLAYER,
            ColorCategory::InterestingPlayer => category_colors::INTERESTING_PLAYER,
            ColorCategory::Border => category_colors::BORDER,
            ColorCategory::Enemy => category_colors::ENEMY,
            ColorCategory::LocalPlayer => category_colors::LOCAL_PLAYER,
        }
    }
}

/// Default colors for each category
pub mod category_colors {
    use super::Color;

    pub const DANGER: Color = [255, 128, 0, 128]; // Translucent orange
    pub const SAFE: Color = [0, 255, 0, 255];
    pub const SAFE_FROM_AOE: Color = [0, 128, 0, 96];
    pub const GENERIC_PLAYER: Color = [128, 128, 128, 255];
    pub const INTERESTING_PLAYER: Color = [255, 128, 128, 255];
    pub const BORDER: Color = [255, 255, 255, 255];
    pub const ENEMY: Color = [255, 0, 0, 255];
    pub const LOCAL_PLAYER: Color = [0, 255, 255, 255];
}

// ─────────────────────────────────────────────────────────────────────────────
// State Hints
// ─────────────────────────────────────────────────────────────────────────────

/// Semantic tag on a timeline state, used for early warnings
/// ("Raidwide in 3.2s").
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateHint {
    #[default]
    None,
    /// Damage to the whole party
    Raidwide,
    /// Heavy damage to the tank(s)
    Tankbuster,
    /// Players should start moving into position
    PositioningStart,
    /// Positioning mechanic resolves
    PositioningEnd,
    /// Free-form tag defined by the encounter
    Custom(String),
}

impl StateHint {
    /// Whether this hint is worth announcing ahead of time
    pub fn is_warning(&self) -> bool {
        !matches!(self, StateHint::None)
    }

    /// Short label for text output
    pub fn label(&self) -> &str {
        match self {
            StateHint::None => "",
            StateHint::Raidwide => "Raidwide",
            StateHint::Tankbuster => "Tankbuster",
            StateHint::PositioningStart => "Positioning",
            StateHint::PositioningEnd => "Resolve",
            StateHint::Custom(label) => label,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Hints
// ─────────────────────────────────────────────────────────────────────────────

/// One line of advice for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextHint {
    pub text: String,
    /// Persistent hints describe an ongoing condition ("Kite the orb!");
    /// non-persistent ones are warnings about something to fix right now.
    #[serde(default)]
    pub persistent: bool,
}

impl TextHint {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            persistent: false,
        }
    }

    pub fn persistent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            persistent: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Config
// ─────────────────────────────────────────────────────────────────────────────

/// Tunables for the encounter engine.
///
/// Every field has a serde default so partial TOML files load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds past a state's expected duration before the timeline is
    /// declared out of sync and falls back to the Unknown state
    #[serde(default = "default_unknown_timeout_secs")]
    pub unknown_timeout_secs: f32,

    /// Maximum number of diagnostics kept per encounter (oldest are dropped)
    #[serde(default = "default_max_diagnostics")]
    pub max_diagnostics: usize,

    /// How far ahead (seconds) upcoming hinted states are announced
    #[serde(default = "default_upcoming_horizon_secs")]
    pub upcoming_horizon_secs: f32,

    /// Maximum number of upcoming states announced at once
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,

    /// Start the timeline automatically once the boss is engaged
    #[serde(default = "default_true")]
    pub auto_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unknown_timeout_secs: default_unknown_timeout_secs(),
            max_diagnostics: default_max_diagnostics(),
            upcoming_horizon_secs: default_upcoming_horizon_secs(),
            upcoming_limit: default_upcoming_limit(),
            auto_start: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde Default Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_unknown_timeout_secs() -> f32 {
    10.0
}
fn default_max_diagnostics() -> usize {
    256
}
fn default_upcoming_horizon_secs() -> f32 {
    15.0
}
fn default_upcoming_limit() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let config: EngineConfig = toml::from_str("unknown_timeout_secs = 4.5").unwrap();
        assert_eq!(config.unknown_timeout_secs, 4.5);
        assert_eq!(config.max_diagnostics, 256);
        assert!(config.auto_start);
    }

    #[test]
    fn state_hint_labels() {
        assert!(!StateHint::None.is_warning());
        assert_eq!(StateHint::Raidwide.label(), "Raidwide");
        assert_eq!(StateHint::Custom("Knockback".into()).label(), "Knockback");
    }
}
