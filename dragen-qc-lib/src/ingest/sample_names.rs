use crate::Result;
use ohno::IntoAppError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DRAGEN_WORDS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)dragen|sample").expect("invalid regex"));
static SEPARATORS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]").expect("invalid regex"));
static PHENOTYPE_SEPARATORS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_]").expect("invalid regex"));
static PHENOTYPE_WORDS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"region|coverage").expect("invalid regex"));

/// Sample-name policy applied once a batch is complete.
pub trait SampleNames {
    /// Display name for a raw sample identifier.
    fn clean(&self, raw: &str) -> String;

    /// Whether a sample, by raw or cleaned name, is dropped from the output.
    fn is_ignored(&self, _name: &str) -> bool {
        false
    }
}

/// Leaves every name untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNames;

impl SampleNames for IdentityNames {
    fn clean(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Removes `dragen` and `sample` and turns separators into spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragenNames;

impl SampleNames for DragenNames {
    fn clean(&self, raw: &str) -> String {
        non_empty_or(dragen_clean(raw), raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCleaning {
    #[default]
    None,
    Dragen,
}

/// Names cleaned and filtered as configured.
#[derive(Debug, Clone)]
pub struct ConfiguredNames {
    strip: Vec<Regex>,
    mode: NameCleaning,
    ignore: Vec<Regex>,
}

impl ConfiguredNames {
    /// Compile the strip and ignore patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is not a valid regular expression.
    pub fn new(strip_patterns: &[String], mode: NameCleaning, ignore_patterns: &[String]) -> Result<Self> {
        Ok(Self {
            strip: compile_all(strip_patterns, "strip_patterns")?,
            mode,
            ignore: compile_all(ignore_patterns, "ignore_samples")?,
        })
    }
}

impl SampleNames for ConfiguredNames {
    fn clean(&self, raw: &str) -> String {
        let stripped = self
            .strip
            .iter()
            .fold(raw.to_string(), |name, regex| regex.replace_all(&name, "").into_owned());

        let cleaned = match self.mode {
            NameCleaning::None => stripped.trim().to_string(),
            NameCleaning::Dragen => dragen_clean(&stripped),
        };

        non_empty_or(cleaned, raw)
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|regex| regex.is_match(name))
    }
}

fn compile_all(patterns: &[String], setting: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).into_app_err_with(|| format!("invalid regular expression '{pattern}' in {setting}")))
        .collect()
}

fn dragen_clean(raw: &str) -> String {
    let without_words = DRAGEN_WORDS_REGEX.replace_all(raw, "");
    let spaced = SEPARATORS_REGEX.replace_all(&without_words, " ");
    collapse_whitespace(&spaced)
}

// a name cleaned away entirely keeps its raw form
fn non_empty_or(cleaned: String, raw: &str) -> String {
    if cleaned.is_empty() { raw.to_string() } else { cleaned }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Display form of a coverage phenotype: separators become spaces and the words
/// `region` and `coverage` are dropped.
#[must_use]
pub fn clean_phenotype(phenotype: &str) -> String {
    let spaced = PHENOTYPE_SEPARATORS_REGEX.replace_all(phenotype, " ");
    let without_words = PHENOTYPE_WORDS_REGEX.replace_all(&spaced, "");
    collapse_whitespace(&without_words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_names() {
        assert_eq!(IdentityNames.clean("Sample-1"), "Sample-1");
        assert!(!IdentityNames.is_ignored("anything"));
    }

    #[test]
    fn test_dragen_names() {
        assert_eq!(DragenNames.clean("SAMPLE_MONO_0_dragen"), "MONO 0");
        assert_eq!(DragenNames.clean("Sample-1"), "1");
        assert_eq!(DragenNames.clean("T_SRR7890936_50pc"), "T SRR7890936 50pc");
    }

    #[test]
    fn test_dragen_names_keep_raw_when_nothing_is_left() {
        assert_eq!(DragenNames.clean("dragen_sample"), "dragen_sample");
    }

    #[test]
    fn test_configured_names_strip_then_mode() {
        let names = ConfiguredNames::new(&["_L00\\d".to_string()], NameCleaning::Dragen, &[]).unwrap();
        assert_eq!(names.clean("S1_L001_dragen"), "S1");
    }

    #[test]
    fn test_configured_names_none_mode() {
        let names = ConfiguredNames::new(&[], NameCleaning::None, &[]).unwrap();
        assert_eq!(names.clean("Sample_1"), "Sample_1");
    }

    #[test]
    fn test_configured_names_ignore() {
        let names = ConfiguredNames::new(&[], NameCleaning::None, &["^NTC".to_string()]).unwrap();
        assert!(names.is_ignored("NTC_1"));
        assert!(!names.is_ignored("S_NTC"));
    }

    #[test]
    fn test_configured_names_bad_pattern() {
        let err = ConfiguredNames::new(&[], NameCleaning::None, &["(".to_string()]).unwrap_err();
        assert!(err.to_string().contains("ignore_samples"));
    }

    #[test]
    fn test_clean_phenotype() {
        assert_eq!(clean_phenotype("qc-coverage-region-1"), "qc 1");
        assert_eq!(clean_phenotype("wgs_normal"), "wgs normal");
        assert_eq!(clean_phenotype("target_bed"), "target bed");
    }
}
