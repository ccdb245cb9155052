//! Persisted reader-preference record

use serde::{Deserialize, Serialize};

/// Color-vision accommodation modes, each mapping to one document filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ColorVisionMode {
    #[default]
    None,
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Grayscale,
}

/// Site theme modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    HighContrast,
    GrayscaleDark,
}

/// The full preference record, persisted per profile.
///
/// Always fully populated: before hydration the defaults apply
/// (scale 1.0, no accommodation, light theme), and hydration replaces
/// the whole record at once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceRecord {
    pub font_scale: f64,
    pub color_vision_mode: ColorVisionMode,
    pub theme_mode: ThemeMode,
}

impl Default for PreferenceRecord {
    fn default() -> Self {
        Self {
            font_scale: 1.0,
            color_vision_mode: ColorVisionMode::None,
            theme_mode: ThemeMode::Light,
        }
    }
}

/// A partial update to the preference record.
///
/// Fields left as `None` keep their current value; `set` performs a
/// shallow merge. No range validation happens here - out-of-range
/// scales are stored but never applied to the document (see the
/// font-scale effect).
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferenceUpdate {
    pub font_scale: Option<f64>,
    pub color_vision_mode: Option<ColorVisionMode>,
    pub theme_mode: Option<ThemeMode>,
}

impl PreferenceUpdate {
    /// Merge this update over an existing record
    pub fn apply_to(&self, record: &PreferenceRecord) -> PreferenceRecord {
        PreferenceRecord {
            font_scale: self.font_scale.unwrap_or(record.font_scale),
            color_vision_mode: self.color_vision_mode.unwrap_or(record.color_vision_mode),
            theme_mode: self.theme_mode.unwrap_or(record.theme_mode),
        }
    }
}

impl ColorVisionMode {
    /// All modes, for CLI listing
    pub const ALL: [ColorVisionMode; 5] = [
        ColorVisionMode::None,
        ColorVisionMode::Protanopia,
        ColorVisionMode::Deuteranopia,
        ColorVisionMode::Tritanopia,
        ColorVisionMode::Grayscale,
    ];

    /// Parse a mode name as used on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "protanopia" => Some(Self::Protanopia),
            "deuteranopia" => Some(Self::Deuteranopia),
            "tritanopia" => Some(Self::Tritanopia),
            "grayscale" => Some(Self::Grayscale),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
            Self::Grayscale => "grayscale",
        }
    }
}

impl ThemeMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "high-contrast" => Some(Self::HighContrast),
            "grayscale-dark" => Some(Self::GrayscaleDark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::HighContrast => "high-contrast",
            Self::GrayscaleDark => "grayscale-dark",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let record = PreferenceRecord::default();
        assert_eq!(record.font_scale, 1.0);
        assert_eq!(record.color_vision_mode, ColorVisionMode::None);
        assert_eq!(record.theme_mode, ThemeMode::Light);
    }

    #[test]
    fn test_update_is_shallow_merge() {
        let record = PreferenceRecord::default();
        let update = PreferenceUpdate {
            font_scale: Some(1.2),
            ..Default::default()
        };

        let merged = update.apply_to(&record);
        assert_eq!(merged.font_scale, 1.2);
        assert_eq!(merged.color_vision_mode, ColorVisionMode::None);
        assert_eq!(merged.theme_mode, ThemeMode::Light);
    }

    #[test]
    fn test_mode_roundtrip_names() {
        for mode in ColorVisionMode::ALL {
            assert_eq!(ColorVisionMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(ThemeMode::parse("high-contrast"), Some(ThemeMode::HighContrast));
        assert_eq!(ThemeMode::parse("neon"), None);
    }

    #[test]
    fn test_record_deserializes_with_missing_fields() {
        let record: PreferenceRecord = serde_json::from_str(r#"{"font_scale": 1.3}"#).unwrap();
        assert_eq!(record.font_scale, 1.3);
        assert_eq!(record.theme_mode, ThemeMode::Light);
    }
}
