//! Visual items and the attributes they vary along.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Color, Lang, Rotation, ShapeKind, Size};
use crate::error::GenerationError;
use crate::rng::SeededRng;

/// One of the four independent visual dimensions of an item.
///
/// Declaration order is the fixed comparison order used when explaining
/// why an option is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Shape,
    Color,
    Size,
    Rotation,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Shape,
        Attribute::Color,
        Attribute::Size,
        Attribute::Rotation,
    ];

    /// Human-readable attribute name.
    pub fn name(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Attribute::Shape, Lang::It) => "forma",
            (Attribute::Shape, Lang::En) => "shape",
            (Attribute::Color, Lang::It) => "colore",
            (Attribute::Color, Lang::En) => "color",
            (Attribute::Size, Lang::It) => "dimensione",
            (Attribute::Size, Lang::En) => "size",
            (Attribute::Rotation, Lang::It) => "rotazione",
            (Attribute::Rotation, Lang::En) => "rotation",
        }
    }

    /// "wrong <attribute>" phrase used in option explanations.
    pub fn wrong_phrase(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Attribute::Shape, Lang::It) => "forma sbagliata",
            (Attribute::Shape, Lang::En) => "wrong shape",
            (Attribute::Color, Lang::It) => "colore sbagliato",
            (Attribute::Color, Lang::En) => "wrong color",
            (Attribute::Size, Lang::It) => "dimensione sbagliata",
            (Attribute::Size, Lang::En) => "wrong size",
            (Attribute::Rotation, Lang::It) => "rotazione sbagliata",
            (Attribute::Rotation, Lang::En) => "wrong rotation",
        }
    }

    /// Every value in this attribute's domain table, in table order.
    pub fn domain(self) -> Vec<AttributeValue> {
        match self {
            Attribute::Shape => ShapeKind::ALL.iter().copied().map(AttributeValue::Shape).collect(),
            Attribute::Color => Color::ALL.iter().copied().map(AttributeValue::Color).collect(),
            Attribute::Size => Size::ALL.iter().copied().map(AttributeValue::Size).collect(),
            Attribute::Rotation => Rotation::ALL
                .iter()
                .copied()
                .map(AttributeValue::Rotation)
                .collect(),
        }
    }

    /// A value from this attribute's domain other than `current`.
    ///
    /// Sizes take the first other entry in table order and consume no draw;
    /// every other attribute draws uniformly from the remaining values.
    pub fn draw_distinct(
        self,
        rng: &mut SeededRng,
        current: AttributeValue,
    ) -> Result<AttributeValue, GenerationError> {
        let pool: Vec<AttributeValue> = self
            .domain()
            .into_iter()
            .filter(|v| *v != current)
            .collect();
        if pool.is_empty() {
            return Err(GenerationError::ExhaustedDomain {
                attribute: self,
                excluded: current.to_string(),
            });
        }
        match self {
            Attribute::Size => Ok(pool[0]),
            _ => rng.pick(&pool),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(Lang::En))
    }
}

/// A concrete value for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    Shape(ShapeKind),
    Color(Color),
    Size(Size),
    Rotation(Rotation),
}

impl AttributeValue {
    pub fn attribute(self) -> Attribute {
        match self {
            AttributeValue::Shape(_) => Attribute::Shape,
            AttributeValue::Color(_) => Attribute::Color,
            AttributeValue::Size(_) => Attribute::Size,
            AttributeValue::Rotation(_) => Attribute::Rotation,
        }
    }

    /// Label used when interpolating this value into rule text.
    pub fn label(self, lang: Lang) -> String {
        match self {
            AttributeValue::Shape(s) => s.label(lang).to_string(),
            AttributeValue::Color(c) => c.label(lang).to_string(),
            AttributeValue::Size(s) => s.label(lang).to_string(),
            AttributeValue::Rotation(r) => r.to_string(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Color(c) => f.write_str(c.hex()),
            other => f.write_str(&other.label(Lang::En)),
        }
    }
}

/// One rendered shape instance, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualItem {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    #[serde(rename = "fill")]
    pub color: Color,
    pub size: Size,
    pub rotation: Rotation,
}

impl VisualItem {
    pub fn new(kind: ShapeKind, color: Color, size: Size, rotation: Rotation) -> Self {
        Self {
            kind,
            color,
            size,
            rotation,
        }
    }

    /// Derive a new item that differs from `self` only in `value`'s attribute.
    pub fn with(self, value: AttributeValue) -> Self {
        match value {
            AttributeValue::Shape(kind) => Self { kind, ..self },
            AttributeValue::Color(color) => Self { color, ..self },
            AttributeValue::Size(size) => Self { size, ..self },
            AttributeValue::Rotation(rotation) => Self { rotation, ..self },
        }
    }

    pub fn value_of(&self, attribute: Attribute) -> AttributeValue {
        match attribute {
            Attribute::Shape => AttributeValue::Shape(self.kind),
            Attribute::Color => AttributeValue::Color(self.color),
            Attribute::Size => AttributeValue::Size(self.size),
            Attribute::Rotation => AttributeValue::Rotation(self.rotation),
        }
    }

    /// Attributes whose values differ, in shape/color/size/rotation order.
    pub fn differing(&self, other: &VisualItem) -> Vec<Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(|a| self.value_of(*a) != other.value_of(*a))
            .collect()
    }

    /// Whether every field is a member of its domain table.
    pub fn is_in_domain(&self) -> bool {
        self.rotation.is_canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> VisualItem {
        VisualItem::new(ShapeKind::Circle, Color::Blue, Size::Small, Rotation::degrees(0))
    }

    #[test]
    fn with_changes_exactly_one_attribute() {
        let item = base();
        let variant = item.with(AttributeValue::Size(Size::Large));
        assert_eq!(item.differing(&variant), vec![Attribute::Size]);
        assert_eq!(variant.kind, ShapeKind::Circle);
    }

    #[test]
    fn differing_uses_fixed_order() {
        let a = base();
        let b = a
            .with(AttributeValue::Rotation(Rotation::degrees(90)))
            .with(AttributeValue::Shape(ShapeKind::Star))
            .with(AttributeValue::Color(Color::Red));
        assert_eq!(
            a.differing(&b),
            vec![Attribute::Shape, Attribute::Color, Attribute::Rotation]
        );
    }

    #[test]
    fn draw_distinct_never_returns_current() {
        let mut rng = SeededRng::new(5);
        for attribute in Attribute::ALL {
            let current = base().value_of(attribute);
            for _ in 0..200 {
                let drawn = attribute.draw_distinct(&mut rng, current).unwrap();
                assert_ne!(drawn, current);
                assert_eq!(drawn.attribute(), attribute);
            }
        }
    }

    #[test]
    fn distinct_size_is_first_other_entry_without_a_draw() {
        let mut rng = SeededRng::new(9);
        let mut untouched = rng.clone();
        let cases = [
            (Size::Small, Size::Medium),
            (Size::Medium, Size::Small),
            (Size::Large, Size::Small),
        ];
        for (current, expected) in cases {
            let drawn = Attribute::Size
                .draw_distinct(&mut rng, AttributeValue::Size(current))
                .unwrap();
            assert_eq!(drawn, AttributeValue::Size(expected));
        }
        assert_eq!(rng.next_f64(), untouched.next_f64());
    }

    #[test]
    fn persisted_field_names() {
        let json = serde_json::to_value(base()).unwrap();
        assert_eq!(json["type"], "circle");
        assert_eq!(json["fill"], "#003399");
        assert_eq!(json["size"], "small");
        assert_eq!(json["rotation"], 0);
    }

    #[test]
    fn out_of_domain_rotation_detected() {
        let item: VisualItem = serde_json::from_str(
            r##"{"type":"star","fill":"#FFCC00","size":"large","rotation":30}"##,
        )
        .unwrap();
        assert!(!item.is_in_domain());
    }
}
