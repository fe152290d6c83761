use mosaic_dither::{DitherError, DitherMode, Palette};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::assets::AssetLoader;

/// Name of the palette used when a requested one does not exist.
pub const FALLBACK_PALETTE: &str = "purple";

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Palette selected at startup
    #[serde(default = "default_palette")]
    pub default_palette: String,

    /// Dither mode selected at startup (`none`, `ordered`, `floyd-steinberg`)
    #[serde(default)]
    pub dither: Option<String>,

    /// Delay before a requested recolor runs
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Translation range as a fraction of the ViewBox size
    #[serde(default = "default_translate_range")]
    pub translate_range: f32,

    /// Allowed image scale
    #[serde(default)]
    pub scale: ScaleConfig,

    /// Frames to wait for a measurable layout before giving up
    #[serde(default = "default_layout_retry_limit")]
    pub layout_retry_limit: u32,

    /// Width in display pixels at which the document is laid out
    #[serde(default = "default_display_width")]
    pub display_width: f32,

    /// Extra palettes, merged over the built-in presets
    #[serde(default)]
    pub palettes: BTreeMap<String, Vec<PaletteColorConfig>>,
}

fn default_palette() -> String {
    FALLBACK_PALETTE.to_string()
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_translate_range() -> f32 {
    0.35
}

fn default_layout_retry_limit() -> u32 {
    120 // about two seconds of frames
}

fn default_display_width() -> f32 {
    crate::rendering::DEFAULT_DISPLAY_WIDTH
}

/// Scale slider limits
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ScaleConfig {
    #[serde(default = "default_scale_min")]
    pub min: f32,
    #[serde(default = "default_scale_max")]
    pub max: f32,
}

fn default_scale_min() -> f32 {
    0.1
}

fn default_scale_max() -> f32 {
    5.0
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min: default_scale_min(),
            max: default_scale_max(),
        }
    }
}

/// One named color of a configured palette
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PaletteColorConfig {
    pub name: String,
    pub hex: String,
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => Self::from_yaml(&content),
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML, falling back to defaults on error.
    pub fn from_yaml(content: &str) -> Self {
        match serde_yaml::from_str::<Self>(content) {
            Ok(config) => {
                tracing::info!(
                    palettes = config.palettes.len(),
                    default_palette = %config.default_palette,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    /// Configured startup dither mode. Unknown names log and fall back to none.
    pub fn dither_mode(&self) -> DitherMode {
        match self.dither.as_deref().map(str::parse::<DitherMode>) {
            None => DitherMode::None,
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                tracing::warn!(%e, "Invalid dither mode in config, using none");
                DitherMode::None
            }
        }
    }

    /// All palette names: built-ins plus configured, sorted, unique.
    pub fn palette_names(&self) -> Vec<String> {
        let mut names: Vec<String> = mosaic_dither::palette::PRESET_NAMES
            .iter()
            .map(|s| s.to_string())
            .chain(self.palettes.keys().map(|k| k.to_lowercase()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Look up a palette by name. Configured palettes shadow built-ins.
    pub fn palette(&self, name: &str) -> Result<Palette, DitherError> {
        let wanted = name.trim();
        if let Some(colors) = self
            .palettes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(wanted))
            .map(|(_, v)| v)
        {
            let pairs: Vec<(&str, &str)> = colors
                .iter()
                .map(|c| (c.name.as_str(), c.hex.as_str()))
                .collect();
            return Ok(Palette::from_hex(&pairs)?);
        }
        Ok(Palette::preset(wanted)?)
    }

    /// Like [`palette`](Self::palette), but unknown or invalid palettes fall
    /// back to the purple preset. Returns the name actually used.
    pub fn palette_or_fallback(&self, name: &str) -> (String, Palette) {
        match self.palette(name) {
            Ok(palette) => (name.trim().to_lowercase(), palette),
            Err(e) => {
                tracing::warn!(palette = %name, %e, "Palette unavailable, using fallback");
                let fallback =
                    Palette::from_preset(mosaic_dither::palette::PURPLE).unwrap_or_default();
                (FALLBACK_PALETTE.to_string(), fallback)
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_palette: default_palette(),
            dither: None,
            debounce_ms: default_debounce_ms(),
            translate_range: default_translate_range(),
            scale: ScaleConfig::default(),
            layout_retry_limit: default_layout_retry_limit(),
            display_width: default_display_width(),
            palettes: BTreeMap::new(),
        }
    }
}
