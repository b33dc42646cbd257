use colored::Color;
use comfy_table::Color as CellColor;
use once_cell::sync::Lazy;
use trackgen_build::Category;

/// Colors for every kind of line the CLI prints.
pub struct Palette {
    pub written: Color,
    pub unchanged: Color,
    pub warning: Color,
    pub note: Color,
    pub failure: Color,
    pub title: Color,
    pub dim: Color,
    pub command: Color,
    pub section: Color,
    pub env_key: Color,
    pub env_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            written: Color::Green,
            unchanged: Color::BrightBlack,
            warning: Color::Yellow,
            note: Color::Blue,
            failure: Color::Red,
            title: Color::BrightBlue,
            dim: Color::BrightBlack,
            command: Color::Magenta,
            section: Color::Cyan,
            env_key: Color::BrightCyan,
            env_text: Color::White,
        }
    }
}

pub static PALETTE: Lazy<Palette> = Lazy::new(Palette::default);

/// Table color for a field category in `inspect`.
pub fn category_color(category: Category) -> CellColor {
    match category {
        Category::NestedDocument | Category::NestedDocumentRef => CellColor::Cyan,
        Category::SerializedDocument => CellColor::Magenta,
        Category::Collection | Category::Association | Category::DynamicValue => CellColor::Blue,
        Category::Temporal(_) | Category::UniqueIdentifier(_) | Category::SoftDeleteMarker(_) => CellColor::Green,
        Category::Opaque => CellColor::Yellow,
        Category::Primitive | Category::ComparableReference => CellColor::Reset,
    }
}

pub struct Glyphs {
    pub written: &'static str,
    pub unchanged: &'static str,
    pub warning: &'static str,
    pub note: &'static str,
    pub arrow: &'static str,
}

pub const GLYPHS: Glyphs = Glyphs {
    written: "✓",
    unchanged: "=",
    warning: "⚠",
    note: "ℹ",
    arrow: "→",
};
