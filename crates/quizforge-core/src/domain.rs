//! Attribute domain tables and bilingual text.
//!
//! Table order matters: cycle and step rules index into these lists.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    It,
    En,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::It, Lang::En];

    pub fn code(self) -> &'static str {
        match self {
            Lang::It => "it",
            Lang::En => "en",
        }
    }
}

/// A value carried once per supported language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual<T = String> {
    pub it: T,
    pub en: T,
}

impl<T> Bilingual<T> {
    pub fn new(it: T, en: T) -> Self {
        Self { it, en }
    }

    pub fn get(&self, lang: Lang) -> &T {
        match lang {
            Lang::It => &self.it,
            Lang::En => &self.en,
        }
    }

    pub fn get_mut(&mut self, lang: Lang) -> &mut T {
        match lang {
            Lang::It => &mut self.it,
            Lang::En => &mut self.en,
        }
    }
}

impl Bilingual<String> {
    pub fn text(it: impl Into<String>, en: impl Into<String>) -> Self {
        Self::new(it.into(), en.into())
    }
}

/// Fill colors, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "#003399")]
    Blue,
    #[serde(rename = "#FFCC00")]
    Yellow,
    #[serde(rename = "#DC2626")]
    Red,
    #[serde(rename = "#059669")]
    Green,
    #[serde(rename = "#7C3AED")]
    Purple,
    #[serde(rename = "#0891B2")]
    Cyan,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Blue,
        Color::Yellow,
        Color::Red,
        Color::Green,
        Color::Purple,
        Color::Cyan,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Color::Blue => "#003399",
            Color::Yellow => "#FFCC00",
            Color::Red => "#DC2626",
            Color::Green => "#059669",
            Color::Purple => "#7C3AED",
            Color::Cyan => "#0891B2",
        }
    }

    pub fn label(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Color::Blue, Lang::It) => "blu",
            (Color::Blue, Lang::En) => "blue",
            (Color::Yellow, Lang::It) => "giallo",
            (Color::Yellow, Lang::En) => "yellow",
            (Color::Red, Lang::It) => "rosso",
            (Color::Red, Lang::En) => "red",
            (Color::Green, Lang::It) => "verde",
            (Color::Green, Lang::En) => "green",
            (Color::Purple, Lang::It) => "viola",
            (Color::Purple, Lang::En) => "purple",
            (Color::Cyan, Lang::It) => "ciano",
            (Color::Cyan, Lang::En) => "cyan",
        }
    }

    /// Palette entry at `index`, wrapping in both directions.
    pub fn at(index: isize) -> Color {
        Self::ALL[index.rem_euclid(Self::ALL.len() as isize) as usize]
    }
}

/// Shape kinds, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Diamond,
    Hexagon,
    Star,
    Cross,
    Arrow,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Diamond,
        ShapeKind::Hexagon,
        ShapeKind::Star,
        ShapeKind::Cross,
        ShapeKind::Arrow,
    ];

    pub fn label(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (ShapeKind::Circle, Lang::It) => "cerchio",
            (ShapeKind::Circle, Lang::En) => "circle",
            (ShapeKind::Square, Lang::It) => "quadrato",
            (ShapeKind::Square, Lang::En) => "square",
            (ShapeKind::Triangle, Lang::It) => "triangolo",
            (ShapeKind::Triangle, Lang::En) => "triangle",
            (ShapeKind::Diamond, Lang::It) => "rombo",
            (ShapeKind::Diamond, Lang::En) => "diamond",
            (ShapeKind::Hexagon, Lang::It) => "esagono",
            (ShapeKind::Hexagon, Lang::En) => "hexagon",
            (ShapeKind::Star, Lang::It) => "stella",
            (ShapeKind::Star, Lang::En) => "star",
            (ShapeKind::Cross, Lang::It) => "croce",
            (ShapeKind::Cross, Lang::En) => "cross",
            (ShapeKind::Arrow, Lang::It) => "freccia",
            (ShapeKind::Arrow, Lang::En) => "arrow",
        }
    }

    pub fn at(index: isize) -> ShapeKind {
        Self::ALL[index.rem_euclid(Self::ALL.len() as isize) as usize]
    }
}

/// Sizes, ordered small to large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    pub fn label(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Size::Small, Lang::It) => "piccola",
            (Size::Small, Lang::En) => "small",
            (Size::Medium, Lang::It) => "media",
            (Size::Medium, Lang::En) => "medium",
            (Size::Large, Lang::It) => "grande",
            (Size::Large, Lang::En) => "large",
        }
    }

    pub fn at(index: isize) -> Size {
        Self::ALL[index.rem_euclid(Self::ALL.len() as isize) as usize]
    }
}

/// Clockwise rotation in degrees.
///
/// Canonical values are the eight 45° steps in `[0, 360)`. Some families
/// index [`Rotation::ALL`], others compute angles arithmetically with
/// [`Rotation::degrees`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation(u16);

impl Rotation {
    pub const ALL: [Rotation; 8] = [
        Rotation(0),
        Rotation(45),
        Rotation(90),
        Rotation(135),
        Rotation(180),
        Rotation(225),
        Rotation(270),
        Rotation(315),
    ];

    /// Normalize an arbitrary angle into `[0, 360)`.
    pub fn degrees(deg: i64) -> Rotation {
        Rotation(deg.rem_euclid(360) as u16)
    }

    pub fn as_degrees(self) -> u16 {
        self.0
    }

    /// Whether this angle is one of the eight table entries.
    pub fn is_canonical(self) -> bool {
        self.0 < 360 && self.0 % 45 == 0
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
