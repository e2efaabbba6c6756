use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxonomy of annotated objects.
///
/// Keys are case-sensitive lowercase strings. Anything unrecognized
/// (including a missing value) reads as [`SpaceCategory::Unknown`], which
/// carries the fallback color and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceCategory {
    Star,
    Galaxy,
    Nebula,
    Planet,
    Moon,
    Asteroid,
    Comet,
    BlackHole,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `#RRGGBBAA`, used for translucent marker fills.
    pub fn hex_with_alpha(self, alpha: u8) -> String {
        format!("{}{:02X}", self.hex(), alpha)
    }
}

impl SpaceCategory {
    pub const ALL: [SpaceCategory; 8] = [
        SpaceCategory::Star,
        SpaceCategory::Galaxy,
        SpaceCategory::Nebula,
        SpaceCategory::Planet,
        SpaceCategory::Moon,
        SpaceCategory::Asteroid,
        SpaceCategory::Comet,
        SpaceCategory::BlackHole,
    ];

    pub fn parse(key: &str) -> Self {
        match key {
            "star" => Self::Star,
            "galaxy" => Self::Galaxy,
            "nebula" => Self::Nebula,
            "planet" => Self::Planet,
            "moon" => Self::Moon,
            "asteroid" => Self::Asteroid,
            "comet" => Self::Comet,
            "blackhole" => Self::BlackHole,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Star => "star",
            Self::Galaxy => "galaxy",
            Self::Nebula => "nebula",
            Self::Planet => "planet",
            Self::Moon => "moon",
            Self::Asteroid => "asteroid",
            Self::Comet => "comet",
            Self::BlackHole => "blackhole",
            Self::Unknown => "unknown",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Star => Color::new(0xFF, 0xD7, 0x00),
            Self::Galaxy => Color::new(0x8A, 0x2B, 0xE2),
            Self::Nebula => Color::new(0xFF, 0x69, 0xB4),
            Self::Planet => Color::new(0x00, 0xBF, 0xFF),
            Self::Moon => Color::new(0xC0, 0xC0, 0xC0),
            Self::Asteroid => Color::new(0xFF, 0xA5, 0x00),
            Self::Comet => Color::new(0x00, 0xFF, 0x7F),
            Self::BlackHole => Color::new(0x00, 0x00, 0x00),
            Self::Unknown => Color::new(0x00, 0xFF, 0x00),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Star => "\u{2B50}",
            Self::Galaxy => "\u{1F30C}",
            Self::Nebula => "\u{1F32B}\u{FE0F}",
            Self::Planet => "\u{1FA90}",
            Self::Moon => "\u{1F319}",
            Self::Asteroid => "\u{2604}\u{FE0F}",
            Self::Comet => "\u{1F4AB}",
            Self::BlackHole => "\u{1F573}\u{FE0F}",
            Self::Unknown => "\u{1F50D}",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Star => "Stars",
            Self::Galaxy => "Galaxies",
            Self::Nebula => "Nebulae",
            Self::Planet => "Planets",
            Self::Moon => "Moons",
            Self::Asteroid => "Asteroids",
            Self::Comet => "Comets",
            Self::BlackHole => "Black Holes",
            Self::Unknown => "Unclassified",
        }
    }
}

impl fmt::Display for SpaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Taxonomy entry as served to clients. Color and icon are always derived
/// from `kind`, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    pub kind: SpaceCategory,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
}

impl Category {
    pub fn new(kind: SpaceCategory, name: Option<String>, description: Option<String>) -> Self {
        Self {
            kind,
            name: name.unwrap_or_else(|| kind.display_name().to_string()),
            description,
            color: kind.color().hex(),
            icon: kind.icon().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryPayload {
    pub kind: SpaceCategory,
    pub name: Option<String>,
    pub description: Option<String>,
}
