//! Editor settings, loaded from TOML.
//!
//! ```toml
//! locale = "zh"
//!
//! [snap]
//! threshold = 0.25
//! rotation = "align_to_mount"
//!
//! [edit]
//! rotate_increment_deg = 45.0
//! duplicate_offset = [0.2, 0.0, 0.2]
//!
//! [requirements]
//! slope = 12.0
//! environment = "outdoor"
//! ```

use std::path::Path;

use botkit_ir::OperatingRequirements;
use botkit_math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AssemblyError, Result};
use crate::snap::SnapSettings;

/// Parameters for interactive edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditSettings {
    /// Step of the rotate command in degrees.
    pub rotate_increment_deg: f64,
    /// Translation applied to duplicates, in meters.
    pub duplicate_offset: [f64; 3],
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            rotate_increment_deg: 90.0,
            duplicate_offset: [0.2, 0.0, 0.2],
        }
    }
}

impl EditSettings {
    /// Rotate step in radians.
    pub fn rotate_increment(&self) -> f64 {
        self.rotate_increment_deg.to_radians()
    }

    /// Duplicate offset as a vector.
    pub fn duplicate_offset(&self) -> Vec3 {
        let [x, y, z] = self.duplicate_offset;
        Vec3::new(x, y, z)
    }
}

/// All editor settings. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Snap search.
    pub snap: SnapSettings,
    /// Edit commands.
    pub edit: EditSettings,
    /// Requirements used for validation.
    pub requirements: OperatingRequirements,
    /// Preferred locale for display names.
    pub locale: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            snap: SnapSettings::default(),
            edit: EditSettings::default(),
            requirements: OperatingRequirements::default(),
            locale: "en".to_string(),
        }
    }
}

impl EditorSettings {
    /// Parse and validate settings from a TOML string.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings: Self = toml::from_str(toml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(toml) => Self::from_toml_str(&toml),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(AssemblyError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.snap.threshold > 0.0 && self.snap.threshold.is_finite()) {
            return Err(AssemblyError::InvalidSettings(
                "snap.threshold must be a positive distance".into(),
            ));
        }
        if !(self.edit.rotate_increment_deg > 0.0 && self.edit.rotate_increment_deg <= 360.0) {
            return Err(AssemblyError::InvalidSettings(
                "edit.rotate_increment_deg must be between 0 and 360".into(),
            ));
        }
        if self.edit.duplicate_offset.iter().any(|v| !v.is_finite()) {
            return Err(AssemblyError::InvalidSettings(
                "edit.duplicate_offset must be finite".into(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.requirements.slope) {
            return Err(AssemblyError::InvalidSettings(
                "requirements.slope must be between -90 and 90 degrees".into(),
            ));
        }
        if self.locale.is_empty() {
            return Err(AssemblyError::InvalidSettings("locale must not be empty".into()));
        }
        Ok(())
    }
}
