use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

pub const METERS_PER_MILLIMETER: f64 = 0.001;
pub const METERS_PER_INCH: f64 = 0.0254;

/// Unit the marker drawing was authored in.
///
/// Serialized as `"mm"`, `"in"` or `"unspecified"`. Any other label, and any
/// non-string value (`null`, numbers, arrays, objects), deserializes to
/// [`DrawingUnit::Unspecified`], which resolves to meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum DrawingUnit {
    Millimeters,
    Inches,
    /// No usable unit was declared; coordinates are taken as meters.
    #[default]
    Unspecified,
}

impl DrawingUnit {
    /// Parse a unit selector. Unknown labels map to `Unspecified`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => DrawingUnit::Millimeters,
            "in" | "inch" | "inches" => DrawingUnit::Inches,
            _ => DrawingUnit::Unspecified,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DrawingUnit::Millimeters => "mm",
            DrawingUnit::Inches => "in",
            DrawingUnit::Unspecified => "unspecified",
        }
    }

    /// Meters per drawing unit.
    #[inline]
    pub fn scale_factor(self) -> f64 {
        match self {
            DrawingUnit::Millimeters => METERS_PER_MILLIMETER,
            DrawingUnit::Inches => METERS_PER_INCH,
            DrawingUnit::Unspecified => 1.0,
        }
    }

    #[inline]
    pub fn is_specified(self) -> bool {
        self != DrawingUnit::Unspecified
    }
}

impl From<DrawingUnit> for String {
    fn from(unit: DrawingUnit) -> Self {
        unit.label().to_string()
    }
}

impl fmt::Display for DrawingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct DrawingUnitVisitor;

impl<'de> Visitor<'de> for DrawingUnitVisitor {
    type Value = DrawingUnit;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a drawing unit label")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(DrawingUnit::from_label(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(DrawingUnit::Unspecified)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(DrawingUnit::Unspecified)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(DrawingUnit::Unspecified)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(DrawingUnit::Unspecified)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DrawingUnit::Unspecified)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DrawingUnit::Unspecified)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        DrawingUnit::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(DrawingUnit::Unspecified)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(DrawingUnit::Unspecified)
    }
}

impl<'de> Deserialize<'de> for DrawingUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DrawingUnitVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_resolve_to_scale_factors() {
        assert_eq!(DrawingUnit::from_label("mm").scale_factor(), 0.001);
        assert_eq!(DrawingUnit::from_label("in").scale_factor(), 0.0254);
        assert_eq!(DrawingUnit::from_label(" Inches ").scale_factor(), 0.0254);
        assert_eq!(DrawingUnit::from_label("cm"), DrawingUnit::Unspecified);
        assert_eq!(DrawingUnit::from_label("").scale_factor(), 1.0);
    }

    #[test]
    fn serde_uses_short_labels() {
        let json = serde_json::to_string(&DrawingUnit::Millimeters).expect("ser");
        assert_eq!(json, "\"mm\"");
        let unit: DrawingUnit = serde_json::from_str("\"furlong\"").expect("de");
        assert_eq!(unit, DrawingUnit::Unspecified);
        assert!(!unit.is_specified());
    }

    #[test]
    fn non_string_values_fall_back_to_unspecified() {
        for raw in ["null", "25.4", "1", "true", "[1, \"mm\"]", r#"{"name": "mm"}"#] {
            let unit: DrawingUnit = serde_json::from_str(raw).expect(raw);
            assert_eq!(unit, DrawingUnit::Unspecified, "{raw}");
        }
        let unit: DrawingUnit = serde_json::from_str("\" MM \"").expect("de");
        assert_eq!(unit, DrawingUnit::Millimeters);
    }
}
