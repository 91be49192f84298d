use super::{ColorScale, CondColor, MetricValue, NumberFormat, Rgb, Section};
use compact_str::{CompactString, format_compact};

/// Appended to a metric key to name the second value of a line.
pub const SECOND_VALUE_SUFFIX: &str = "(second value)";

/// Ordering priority of columns without an explicit placement.
pub const DEFAULT_PRIORITY: u32 = 1000;

/// Panel-of-normals columns are placed from here on, after every regular column.
pub const PANEL_PRIORITY_OFFSET: u32 = 2000;

/// Collapse whitespace runs, trim, and lowercase a raw metric name.
#[must_use]
pub fn normalize_metric_key(metric: &str) -> CompactString {
    let mut key = CompactString::with_capacity(metric.len());
    for word in metric.split_whitespace() {
        if !key.is_empty() {
            key.push(' ');
        }
        key.push_str(&word.to_lowercase());
    }
    key
}

#[must_use]
pub fn second_value_key(key: &str) -> CompactString {
    format_compact!("{key}{SECOND_VALUE_SUFFIX}")
}

/// Display-time transform applied to numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Modify {
    #[default]
    Identity,
    Scale(f64),
}

impl Modify {
    /// Shows raw counts in millions.
    pub const MILLIONS: Self = Self::Scale(0.000_001);

    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Scale(factor) => value * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CondPredicate {
    StrEq(&'static str),
    StrNe(&'static str),
    Lt(f64),
    Gt(f64),
    Otherwise,
}

impl CondPredicate {
    /// Evaluate against the raw (unmodified) value.
    #[must_use]
    pub fn matches(self, value: &MetricValue) -> bool {
        match self {
            Self::StrEq(expected) => value.to_string() == expected,
            Self::StrNe(expected) => value.to_string() != expected,
            Self::Lt(bound) => value.as_f64().is_some_and(|v| v < bound),
            Self::Gt(bound) => value.as_f64().is_some_and(|v| v > bound),
            Self::Otherwise => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondRule {
    pub predicate: CondPredicate,
    pub color: CondColor,
}

impl CondRule {
    #[must_use]
    pub const fn new(predicate: CondPredicate, color: CondColor) -> Self {
        Self { predicate, color }
    }
}

/// Presentation metadata for one metric key, as registered during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderConfig {
    pub namespace: CompactString,
    pub title: CompactString,
    pub description: CompactString,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub scale: Option<ColorScale>,
    pub color: Rgb,
    pub suffix: &'static str,
    pub format: NumberFormat,

    /// Evaluated in order, first match wins.
    pub cond_formatting: &'static [CondRule],
    pub modify: Modify,

    /// Visibility in the general statistics table.
    pub hidden: bool,

    /// Visibility in the module's own table. Never reaches renderers directly.
    pub hidden_in_own_table: bool,
    pub priority: u32,
}

impl HeaderConfig {
    #[must_use]
    pub fn section_defaults(section: Section) -> Self {
        match section {
            Section::CnvSummary | Section::SexGenotyper => Self {
                namespace: section.namespace().into(),
                title: CompactString::default(),
                description: CompactString::default(),
                min: Some(0.0),
                max: None,
                scale: Some(ColorScale::GnBu),
                color: Rgb::new(255, 150, 30),
                suffix: "",
                format: NumberFormat::grouped(1),
                cond_formatting: &[],
                modify: Modify::Identity,
                hidden: true,
                hidden_in_own_table: false,
                priority: DEFAULT_PRIORITY,
            },
            Section::CoverageSummary => Self {
                namespace: section.namespace().into(),
                title: CompactString::default(),
                description: CompactString::default(),
                min: Some(0.0),
                max: None,
                scale: None,
                color: Rgb::new(55, 126, 184),
                suffix: "",
                format: NumberFormat::grouped(1),
                cond_formatting: &[],
                modify: Modify::Identity,
                hidden: false,
                hidden_in_own_table: false,
                priority: DEFAULT_PRIORITY,
            },
        }
    }

    /// Fill an empty title or description with the raw metric name.
    #[must_use]
    pub fn with_fallback_title(mut self, raw_name: &str) -> Self {
        if self.title.is_empty() {
            self.title = raw_name.into();
        }
        if self.description.is_empty() {
            self.description = raw_name.into();
        }
        self
    }

    /// Produce the renderer-facing column for one table view.
    #[must_use]
    pub fn to_column(&self, key: &str, view: TableView) -> ColumnHeader {
        ColumnHeader {
            key: key.into(),
            namespace: self.namespace.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            min: self.min,
            max: self.max,
            scale: self.scale,
            color: self.color,
            suffix: self.suffix,
            format: self.format,
            cond_formatting: self.cond_formatting,
            modify: self.modify,
            hidden: match view {
                TableView::General => self.hidden,
                TableView::Module => self.hidden_in_own_table,
            },
            priority: self.priority,
        }
    }
}

/// Which table a column is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableView {
    General,
    Module,
}

/// A finalized column header handed to report generators.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    pub key: CompactString,
    pub namespace: CompactString,
    pub title: CompactString,
    pub description: CompactString,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub scale: Option<ColorScale>,
    pub color: Rgb,
    pub suffix: &'static str,
    pub format: NumberFormat,
    pub cond_formatting: &'static [CondRule],
    pub modify: Modify,
    pub hidden: bool,
    pub priority: u32,
}

impl ColumnHeader {
    /// Numeric value after the modify transform, if the value is numeric.
    #[must_use]
    pub fn numeric_value(&self, value: &MetricValue) -> Option<f64> {
        value.as_f64().map(|v| self.modify.apply(v))
    }

    /// Formatted cell text: modify, number format, and suffix for numbers; text verbatim.
    #[must_use]
    pub fn display_value(&self, value: &MetricValue) -> String {
        match self.numeric_value(value) {
            Some(v) => format!("{}{}", self.format.format(v), self.suffix),
            None => value.to_string(),
        }
    }

    #[must_use]
    pub fn highlight(&self, value: &MetricValue) -> Option<CondColor> {
        self.cond_formatting
            .iter()
            .find(|rule| rule.predicate.matches(value))
            .map(|rule| rule.color)
    }

    /// Background shade from the colour scale. Missing bounds come from the observed range.
    #[must_use]
    pub fn shade(&self, value: &MetricValue, observed: Option<(f64, f64)>) -> Option<Rgb> {
        let scale = self.scale?;
        let v = self.numeric_value(value)?;
        let low = self.min.or_else(|| observed.map(|(lo, _)| lo))?;
        let high = self.max.or_else(|| observed.map(|(_, hi)| hi))?;
        if high <= low {
            return None;
        }
        Some(scale.color_at((v - low) / (high - low)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KARYOTYPE_RULES: &[CondRule] = &[
        CondRule::new(CondPredicate::StrEq("XX"), CondColor::Green),
        CondRule::new(CondPredicate::Otherwise, CondColor::Red),
    ];

    fn column() -> ColumnHeader {
        HeaderConfig::section_defaults(Section::CnvSummary).to_column("metric", TableView::Module)
    }

    #[test]
    fn test_normalize_metric_key() {
        assert_eq!(normalize_metric_key("  Number   of\tSegments "), "number of segments");
        assert_eq!(normalize_metric_key("ALREADY"), "already");
    }

    #[test]
    fn test_normalize_metric_key_is_idempotent() {
        for raw in ["Number of Segments", " a  B c ", "x", "number of filtered records (total)(second value)"] {
            let once = normalize_metric_key(raw);
            assert_eq!(normalize_metric_key(&once), once);
        }
    }

    #[test]
    fn test_second_value_key() {
        assert_eq!(
            second_value_key("number of filtered records (total)"),
            "number of filtered records (total)(second value)"
        );
    }

    #[test]
    fn test_modify_apply() {
        assert!((Modify::MILLIONS.apply(3_000_000.0) - 3.0).abs() < 1e-9);
        assert!((Modify::Identity.apply(3.5) - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_predicates() {
        let xx = MetricValue::Text("XX".into());
        assert!(CondPredicate::StrEq("XX").matches(&xx));
        assert!(!CondPredicate::StrNe("XX").matches(&xx));
        assert!(CondPredicate::Lt(0.0).matches(&MetricValue::Float(-0.1)));
        assert!(CondPredicate::Gt(1.0).matches(&MetricValue::Integer(2)));
        assert!(!CondPredicate::Gt(1.0).matches(&xx));
        assert!(CondPredicate::Otherwise.matches(&xx));
    }

    #[test]
    fn test_views_pick_visibility() {
        let config = HeaderConfig::section_defaults(Section::CnvSummary);
        assert!(config.to_column("k", TableView::General).hidden);
        assert!(!config.to_column("k", TableView::Module).hidden);
    }

    #[test]
    fn test_fallback_title_only_fills_empty_fields() {
        let config = HeaderConfig::section_defaults(Section::CnvSummary).with_fallback_title("Raw Name");
        assert_eq!(config.title, "Raw Name");
        assert_eq!(config.description, "Raw Name");

        let mut titled = HeaderConfig::section_defaults(Section::CnvSummary);
        titled.title = "Segments".into();
        assert_eq!(titled.with_fallback_title("raw").title, "Segments");
    }

    #[test]
    fn test_display_value() {
        let mut col = column();
        col.format = NumberFormat::grouped(0);
        col.modify = Modify::MILLIONS;
        col.suffix = " M";
        assert_eq!(col.display_value(&MetricValue::Integer(3_100_000_000)), "3,100 M");
        assert_eq!(col.display_value(&MetricValue::Text("NA".into())), "NA");
    }

    #[test]
    fn test_highlight_first_match_wins() {
        let mut col = column();
        col.cond_formatting = KARYOTYPE_RULES;
        assert_eq!(col.highlight(&MetricValue::Text("XX".into())), Some(CondColor::Green));
        assert_eq!(col.highlight(&MetricValue::Text("XXY".into())), Some(CondColor::Red));
        assert_eq!(column().highlight(&MetricValue::Integer(1)), None);
    }

    #[test]
    fn test_shade_uses_bounds() {
        let mut col = column();
        col.min = Some(0.0);
        col.max = Some(10.0);
        let [low, _, high] = ColorScale::GnBu.stops();
        assert_eq!(col.shade(&MetricValue::Integer(0), None), Some(low));
        assert_eq!(col.shade(&MetricValue::Integer(10), None), Some(high));
        assert_eq!(col.shade(&MetricValue::Text("NA".into()), None), None);
    }

    #[test]
    fn test_shade_falls_back_to_observed_range() {
        let mut col = column();
        col.min = None;
        let [_, mid, _] = ColorScale::GnBu.stops();
        assert_eq!(col.shade(&MetricValue::Integer(5), Some((0.0, 10.0))), Some(mid));
        assert_eq!(col.shade(&MetricValue::Integer(5), None), None);
        assert_eq!(col.shade(&MetricValue::Integer(5), Some((5.0, 5.0))), None);
    }
}
