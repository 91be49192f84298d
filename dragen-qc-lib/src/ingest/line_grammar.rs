use regex::Regex;
use std::sync::LazyLock;

/// `<SECTION>,,<METRIC>,<VALUE1>[,<VALUE2>]`; fields never contain commas and anything past
/// a fifth field is dropped.
static LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^,]+),,([^,]+),([^,]+),?([^,]*)").expect("invalid regex"));

/// The fields of a line matching the metric grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricLine<'a> {
    pub section: &'a str,
    pub metric: &'a str,
    pub value1: &'a str,
    value2: &'a str,
}

impl<'a> MetricLine<'a> {
    /// The optional second value; blank fields count as absent.
    #[must_use]
    pub fn value2(&self) -> Option<&'a str> {
        if self.value2.trim().is_empty() { None } else { Some(self.value2) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Metric(MetricLine<'a>),
    Invalid,
}

#[must_use]
pub fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    LINE_REGEX.captures(line).map_or(LineKind::Invalid, |c| {
        let field = |i| c.get(i).map_or("", |m| m.as_str());
        LineKind::Metric(MetricLine {
            section: field(1),
            metric: field(2),
            value1: field(3),
            value2: field(4),
        })
    })
}
