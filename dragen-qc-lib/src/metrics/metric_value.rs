use super::Modify;
use compact_str::CompactString;
use core::fmt;

/// A single value read from a metric line.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(CompactString),
}

impl MetricValue {
    /// Coerce a raw field, preferring an integer, then a float, and finally keeping the text as-is.
    ///
    /// Surrounding whitespace is ignored for the numeric attempts but kept in the text fallback.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::Integer(value);
        }

        if let Ok(value) = trimmed.parse::<f64>() {
            return Self::Float(value);
        }

        Self::Text(CompactString::new(raw))
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "Metric counts stay well within f64's exact integer range")]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }

    /// Apply a display transform. Text passes through untouched.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "Metric counts stay well within f64's exact integer range")]
    pub fn modified(&self, modify: Modify) -> Self {
        match (self, modify) {
            (_, Modify::Identity) | (Self::Text(_), _) => self.clone(),
            (Self::Integer(i), Modify::Scale(factor)) => Self::Float(*i as f64 * factor),
            (Self::Float(f), Modify::Scale(factor)) => Self::Float(f * factor),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}
