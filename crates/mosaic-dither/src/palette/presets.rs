//! Built-in palette presets.
//!
//! Both presets share five colors and differ only in their second entry.

/// A named hex color in a preset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetColor {
    pub name: &'static str,
    pub hex: &'static str,
}

const fn color(name: &'static str, hex: &'static str) -> PresetColor {
    PresetColor { name, hex }
}

/// The default preset, with royal purple.
pub const PURPLE: &[PresetColor] = &[
    color("azure blue", "#1496dc"),
    color("royal purple", "#6432aa"),
    color("white", "#ffffff"),
    color("crimson red", "#eb0000"),
    color("vermilion orange", "#ff6e32"),
    color("golden yellow", "#ffe100"),
];

/// Like [`PURPLE`] with pure blue in place of royal purple.
pub const BLUE: &[PresetColor] = &[
    color("azure blue", "#1496dc"),
    color("blue", "#0000ff"),
    color("white", "#ffffff"),
    color("crimson red", "#eb0000"),
    color("vermilion orange", "#ff6e32"),
    color("golden yellow", "#ffe100"),
];

/// Names accepted by [`preset`], default first.
pub const PRESET_NAMES: &[&str] = &["purple", "blue"];

/// Look up a built-in preset by name (case-insensitive).
pub fn preset(name: &str) -> Option<&'static [PresetColor]> {
    match name.trim().to_ascii_lowercase().as_str() {
        "purple" => Some(PURPLE),
        "blue" => Some(BLUE),
        _ => None,
    }
}
