use regex::Regex;
use std::sync::LazyLock;
use strum::{Display, EnumIter};

static CNV_SUMMARY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*CNV\s*SUMMARY\s*$").expect("invalid regex"));
static SEX_GENOTYPER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*SEX\s*GENOTYPER\s*$").expect("invalid regex"));
static COVERAGE_SUMMARY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*COVERAGE\s*SUMMARY\s*$").expect("invalid regex"));

/// The section literal leading every metric line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display)]
pub enum Section {
    #[strum(to_string = "CNV SUMMARY")]
    CnvSummary,

    #[strum(to_string = "SEX GENOTYPER")]
    SexGenotyper,

    #[strum(to_string = "COVERAGE SUMMARY")]
    CoverageSummary,
}

impl Section {
    /// Recognize a section field, ignoring case and surrounding or inner whitespace.
    #[must_use]
    pub fn recognize(field: &str) -> Option<Self> {
        if CNV_SUMMARY_REGEX.is_match(field) {
            Some(Self::CnvSummary)
        } else if SEX_GENOTYPER_REGEX.is_match(field) {
            Some(Self::SexGenotyper)
        } else if COVERAGE_SUMMARY_REGEX.is_match(field) {
            Some(Self::CoverageSummary)
        } else {
            None
        }
    }

    /// Column-grouping namespace shown in reports.
    #[must_use]
    pub const fn namespace(self) -> &'static str {
        match self {
            Self::CnvSummary | Self::SexGenotyper => "DRAGEN CNV",
            Self::CoverageSummary => "DRAGEN coverage",
        }
    }
}
