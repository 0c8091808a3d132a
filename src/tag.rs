use std::fmt;
use std::str::FromStr;

use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};

// ── Identity ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    pub const PLACEHOLDER: &'static str = "temp";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn fresh() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn placeholder() -> Self {
        Self::new(Self::PLACEHOLDER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Percent ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid percentage '{0}', expected '<number>%'")]
pub struct PercentParseError(String);

/// A position expressed as a percentage of an image dimension.
///
/// Stored as a number; `"<number>%"` is only the display and wire form.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Percent(f32);

impl Percent {
    pub const ZERO: Self = Self(0.0);
    pub const HALF: Self = Self(50.0);

    /// Non-finite input collapses to zero.
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value)
        } else {
            Self::ZERO
        }
    }

    /// Pixel length this percentage covers of `dimension`.
    pub fn of(self, dimension: f32) -> f32 {
        self.0 * dimension / 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for Percent {
    type Err = PercentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        match number.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(Self(value)),
            _ => Err(PercentParseError(s.to_owned())),
        }
    }
}

impl Serialize for Percent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PercentVisitor;

        impl<'de> Visitor<'de> for PercentVisitor {
            type Value = Percent;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a percentage string like \"23%\" or a number")
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Percent::new(value as f32))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Percent::new(value as f32))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Percent::new(value as f32))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PercentVisitor)
    }
}

// ── Tag ─────────────────────────────────────────────────────────────────────

/// Every position field of a tag. Updates replace all of them at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPosition {
    pub x: f32,
    pub y: f32,
    pub position_x: f32,
    pub position_y: f32,
    pub percent_x: Percent,
    pub percent_y: Percent,
}

impl TagPosition {
    /// Where freshly added tags start out.
    pub fn centered() -> Self {
        Self {
            percent_x: Percent::HALF,
            percent_y: Percent::HALF,
            ..Self::default()
        }
    }

    pub fn at_percent(percent_x: Percent, percent_y: Percent) -> Self {
        Self {
            percent_x,
            percent_y,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default)]
    pub id: Option<TagId>,
    #[serde(flatten)]
    pub position: TagPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Tag {
    pub fn new(id: TagId, content: Option<String>) -> Self {
        Self {
            id: Some(id),
            position: TagPosition::centered(),
            content,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            id: Some(TagId::placeholder()),
            position: TagPosition::at_percent(Percent::new(23.0), Percent::new(15.0)),
            content: Some("TEMP".to_owned()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.as_ref().is_some_and(|id| id.as_str() == TagId::PLACEHOLDER)
    }

    /// Text shown on the marker; the index stands in for missing content.
    pub fn label(&self, index: usize) -> String {
        match &self.content {
            Some(content) => content.clone(),
            None => index.to_string(),
        }
    }
}
