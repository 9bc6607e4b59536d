//! Combat tuning and combo definitions, loaded from RON or JSON.
//!
//! Every field has a default taken from `constants`, so a file only lists
//! what it overrides. `validate` runs on every load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::{default_combos, ComboDefinition, ComboLibrary, LibraryError, OverlapPolicy};
use crate::constants::*;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid charge settings: increment {increment}, threshold {threshold}")]
    InvalidCharge { increment: f32, threshold: f32 },
    #[error("Invalid combo window: {0}")]
    InvalidWindow(f32),
    #[error("Invalid special attack settings: {0}")]
    InvalidSpecial(String),
    #[error(transparent)]
    Library(#[from] LibraryError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeSettings {
    pub increment_per_hit: f32,
    pub threshold: f32,
    /// Drain charge after every completed combo
    pub reset_on_combo: bool,
}

impl Default for ChargeSettings {
    fn default() -> Self {
        Self {
            increment_per_hit: CHARGE_PER_HIT,
            threshold: CHARGE_THRESHOLD,
            reset_on_combo: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PunchSettings {
    pub damage: f32,
    pub offset: [f32; 3],
    pub half_extents: [f32; 3],
}

impl Default for PunchSettings {
    fn default() -> Self {
        Self {
            damage: PUNCH_DAMAGE,
            offset: PUNCH_BOX_OFFSET,
            half_extents: PUNCH_BOX_HALF_EXTENTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialSettings {
    pub radius: f32,
    pub max_distance: f32,
    pub direction: [f32; 3],
    pub interval: f32,
    pub damage_per_tick: f32,
    pub overlap: OverlapPolicy,
}

impl Default for SpecialSettings {
    fn default() -> Self {
        Self {
            radius: SPECIAL_RADIUS,
            max_distance: SPECIAL_MAX_DISTANCE,
            direction: SPECIAL_DIRECTION,
            interval: SPECIAL_TICK_INTERVAL,
            damage_per_tick: SPECIAL_DAMAGE_PER_TICK,
            overlap: OverlapPolicy::Stack,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatSettings {
    pub charge: ChargeSettings,
    pub combo_window: f32,
    pub punch: PunchSettings,
    pub special: SpecialSettings,
    pub enemy_layers: u32,
    pub combos: Vec<ComboDefinition>,
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            charge: ChargeSettings::default(),
            combo_window: COMBO_WINDOW,
            punch: PunchSettings::default(),
            special: SpecialSettings::default(),
            enemy_layers: ENEMY_LAYER,
            combos: default_combos(),
        }
    }
}

impl CombatSettings {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = ron::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load by file extension (`.ron` or `.json`)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::from_ron(&text)?,
            Some("json") => Self::from_json(&text)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };
        tracing::info!(path = %path.display(), combos = settings.combos.len(), "combat config loaded");
        Ok(settings)
    }

    pub fn to_ron(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let charge = &self.charge;
        if !charge.threshold.is_finite()
            || charge.threshold <= 0.0
            || !charge.increment_per_hit.is_finite()
            || charge.increment_per_hit < 0.0
        {
            return Err(ConfigError::InvalidCharge {
                increment: charge.increment_per_hit,
                threshold: charge.threshold,
            });
        }

        if !self.combo_window.is_finite() || self.combo_window <= 0.0 {
            return Err(ConfigError::InvalidWindow(self.combo_window));
        }

        let special = &self.special;
        if !special.interval.is_finite() || special.interval <= 0.0 {
            return Err(ConfigError::InvalidSpecial(format!(
                "interval must be positive, got {}",
                special.interval
            )));
        }
        if !special.radius.is_finite() || special.radius <= 0.0 {
            return Err(ConfigError::InvalidSpecial(format!(
                "radius must be positive, got {}",
                special.radius
            )));
        }

        self.build_library()?;
        Ok(())
    }

    /// Freeze the combo list into a validated library
    pub fn build_library(&self) -> Result<ComboLibrary, LibraryError> {
        ComboLibrary::new(self.combos.clone())
    }
}
