//! User-tunable settings.
//!
//! Settings are stored as JSON in the OS config directory. Every struct
//! carries `#[serde(default)]`, so a hand-edited file only needs the keys
//! it wants to override.

use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::timeline::gesture::WheelZoom;

/// What happens to a dragged bar that would end past the current horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditBounds {
    /// Only clamp at zero; the horizon grows on the next data pass.
    #[default]
    ExtendHorizon,
    /// Keep the whole interval inside `[0, horizon]`, preserving its length.
    ClampToHorizon,
}

/// Cosmetic strings shown by the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineLabels {
    pub empty_shipments: String,
    pub empty_routes: String,
    pub shipments_column: String,
    pub routes_column: String,
    pub shipments_legend: String,
    pub routes_legend: String,
}

impl Default for TimelineLabels {
    fn default() -> Self {
        Self {
            empty_shipments: "Add shipments to see their time windows".into(),
            empty_routes: "The result contains no routes".into(),
            shipments_column: "Shipments".into(),
            routes_column: "Vehicles".into(),
            shipments_legend: "Shipment time windows (pickup / delivery) · drag bars to reschedule"
                .into(),
            routes_legend: "Optimized routes per vehicle".into(),
        }
    }
}

/// Timeline behaviour and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub min_view_duration: f64,
    pub button_zoom_in: f64,
    pub button_zoom_out: f64,
    pub wheel_zoom_in: f64,
    pub wheel_zoom_out: f64,
    pub min_tick_spacing_px: f64,
    /// Lane width used until the first real measurement arrives.
    pub default_width_px: f64,
    pub name_column_width: f32,
    pub row_height: f32,
    pub header_height: f32,
    pub min_bar_width_px: f64,
    pub edit_bounds: EditBounds,
    pub labels: TimelineLabels,
    #[serde(with = "hex_color_vec")]
    pub palette: Vec<Color32>,
    #[serde(with = "hex_color")]
    pub late_color: Color32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_view_duration: 60.0,
            button_zoom_in: 0.8,
            button_zoom_out: 1.2,
            wheel_zoom_in: 0.9,
            wheel_zoom_out: 1.1,
            min_tick_spacing_px: 60.0,
            default_width_px: 800.0,
            name_column_width: 144.0,
            row_height: 48.0,
            header_height: 34.0,
            min_bar_width_px: 4.0,
            edit_bounds: EditBounds::default(),
            labels: TimelineLabels::default(),
            palette: vec![
                Color32::from_rgb(0x3b, 0x82, 0xf6),
                Color32::from_rgb(0x22, 0xc5, 0x5e),
                Color32::from_rgb(0xf5, 0x9e, 0x0b),
                Color32::from_rgb(0xef, 0x44, 0x44),
                Color32::from_rgb(0x8b, 0x5c, 0xf6),
                Color32::from_rgb(0xec, 0x48, 0x99),
                Color32::from_rgb(0x14, 0xb8, 0xa6),
                Color32::from_rgb(0xf9, 0x73, 0x16),
            ],
            late_color: Color32::from_rgb(0xef, 0x44, 0x44),
        }
    }
}

impl TimelineConfig {
    pub fn wheel_zoom(&self) -> WheelZoom {
        WheelZoom {
            zoom_in: self.wheel_zoom_in,
            zoom_out: self.wheel_zoom_out,
        }
    }

    /// Palette entry for a row, cycling when there are more rows than colors.
    pub fn row_color(&self, index: usize) -> Color32 {
        if self.palette.is_empty() {
            return Color32::from_rgb(0x3b, 0x82, 0xf6);
        }
        self.palette[index % self.palette.len()]
    }
}

/// Everything persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub timeline: TimelineConfig,
}

impl AppSettings {
    /// Directory holding `settings.json`.
    pub fn config_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "VrpScheduleViewer")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Read settings, falling back to defaults when the file is missing or broken.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no settings file, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), crate::io::IoError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

// ─── Hex-colour serde helpers ───────────────────────────────────────────────

pub mod hex_color {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_hex(*color))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hex_color(&s).map_err(serde::de::Error::custom)
    }

    pub fn to_hex(color: Color32) -> String {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        if a == 255 {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }

    pub fn parse_hex_color(s: &str) -> Result<Color32, String> {
        let s = s.trim().trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid hex color '{}'", s));
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string());
        match s.len() {
            6 => Ok(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color32::from_rgba_unmultiplied(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => Err(format!("Invalid hex color '{}': expected 6 or 8 hex digits", s)),
        }
    }
}

mod hex_color_vec {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(colors: &[Color32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(colors.iter().map(|c| super::hex_color::to_hex(*c)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Color32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings: Vec<String> = Vec::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| super::hex_color::parse_hex_color(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"timeline":{"edit_bounds":"clamp_to_horizon","row_height":30}}"#)
                .unwrap();
        assert_eq!(settings.timeline.edit_bounds, EditBounds::ClampToHorizon);
        assert_eq!(settings.timeline.row_height, 30.0);
        assert_eq!(settings.timeline.min_view_duration, 60.0);
        assert_eq!(settings.timeline.palette.len(), 8);
    }

    #[test]
    fn palette_round_trips_as_hex() {
        let config = TimelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"#3B82F6\""));
        let back: TimelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.palette, config.palette);
        assert_eq!(back.late_color, config.late_color);
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!(hex_color::parse_hex_color("#12345").is_err());
        assert!(hex_color::parse_hex_color("zzzzzz").is_err());
        assert_eq!(
            hex_color::parse_hex_color("#ff0000").unwrap(),
            Color32::from_rgb(255, 0, 0)
        );
    }

    #[test]
    fn missing_settings_file_falls_back() {
        let path = std::env::temp_dir().join("vrp-schedule-missing-settings/none.json");
        assert_eq!(AppSettings::load(&path), AppSettings::default());
    }

    #[test]
    fn row_color_cycles() {
        let config = TimelineConfig::default();
        assert_eq!(config.row_color(0), config.row_color(8));
    }
}
