use regex::Regex;
use std::sync::LazyLock;

static CNV_FILE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*)\.cnv_metrics(.*)\.csv$").expect("invalid regex"));
static COVERAGE_FILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\.(.+)_coverage_metrics(.*)\.csv$").expect("invalid regex"));
static COVERAGE_FILE_NO_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)_coverage_metrics(.*)\.csv$").expect("invalid regex"));

/// Sample identity derived from a metric file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleKey {
    pub sample: String,

    /// Coverage files only: region token and suffix, e.g. `wgs_normal`.
    pub phenotype: Option<String>,
}

impl SampleKey {
    #[must_use]
    pub fn new(sample: impl Into<String>, phenotype: Option<String>) -> Self {
        Self {
            sample: sample.into(),
            phenotype,
        }
    }

    /// The identifier used for duplicate detection, before any cleaning.
    #[must_use]
    pub fn raw_id(&self) -> String {
        match &self.phenotype {
            Some(phenotype) => format!("{}_{phenotype}", self.sample),
            None => self.sample.clone(),
        }
    }
}

/// Cheap pre-filter used during discovery; [`parse_cnv_file_name`] decides validity.
#[must_use]
pub fn is_cnv_candidate(file_name: &str) -> bool {
    file_name.contains("cnv_metrics") && file_name.ends_with(".csv")
}

#[must_use]
pub fn is_coverage_candidate(file_name: &str) -> bool {
    file_name.contains("_coverage_metrics") && file_name.ends_with(".csv")
}

/// `<prefix>.cnv_metrics[<suffix>].csv`; a non-empty suffix is appended to the sample.
#[must_use]
pub fn parse_cnv_file_name(file_name: &str) -> Option<SampleKey> {
    let captures = CNV_FILE_REGEX.captures(file_name)?;
    let prefix = captures.get(1)?.as_str();
    if prefix.is_empty() {
        return None;
    }

    let suffix = captures.get(2).map_or("", |m| m.as_str());
    Some(SampleKey::new(format!("{prefix}{suffix}"), None))
}

/// `<prefix>.<token>_coverage_metrics[<suffix>].csv`, or the same without `.<token>`.
#[must_use]
pub fn parse_coverage_file_name(file_name: &str) -> Option<SampleKey> {
    let (prefix, token, suffix) = if let Some(c) = COVERAGE_FILE_REGEX.captures(file_name) {
        (c.get(1)?.as_str(), c.get(2)?.as_str(), c.get(3).map_or("", |m| m.as_str()))
    } else {
        let c = COVERAGE_FILE_NO_TOKEN_REGEX.captures(file_name)?;
        (c.get(1)?.as_str(), "", c.get(2).map_or("", |m| m.as_str()))
    };

    let parts: Vec<&str> = [token, suffix.trim_start_matches('_')]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    let phenotype = if parts.is_empty() { None } else { Some(parts.join("_")) };

    Some(SampleKey::new(prefix, phenotype))
}
