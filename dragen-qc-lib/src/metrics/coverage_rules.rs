use super::{ColorScale, HeaderConfig, Modify, NumberFormat, Section};
use compact_str::{CompactString, format_compact};
use regex::Regex;
use std::sync::LazyLock;

static COVERAGE_RULES: LazyLock<Vec<(Regex, RuleTemplate)>> = LazyLock::new(|| {
    RULE_PATTERNS
        .iter()
        .map(|(pattern, template)| (Regex::new(&format!("(?i){pattern}")).expect("invalid regex"), *template))
        .collect()
});

static PCT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)PCT(.+)").expect("invalid regex"));
static LOWER_BOUND_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)x:").expect("invalid regex"));
static UPPER_BOUND_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\s*(.+)\)").expect("invalid regex"));

type RuleTemplate = fn(&str, &CountUnits) -> RuleMatch;

/// Ordered; the first pattern found in a metric name decides its key and header.
const RULE_PATTERNS: &[(&str, RuleTemplate)] = &[
    (r"Aligned (bases|reads)$", aligned_total),
    (r"Aligned (bases|reads) in .+", aligned_in_region),
    (r"Average alignment coverage over .+()", average_alignment_coverage),
    (r"Uniformity of coverage \((.+)\) over .+", uniformity),
    (r"PCT of .+ with coverage (.+)", pct_with_coverage),
    (r"Average (chr X|chr Y|mitochondrial|autosomal) coverage over .+", average_chromosome_coverage),
    (r"Median autosomal coverage over .+()", median_autosomal_coverage),
    (r"Mean/Median autosomal coverage ratio over .+()", mean_median_ratio),
    (r"XAvgCov/YAvgCov ratio over .+()", x_y_ratio),
    (r"(X|Y)AvgCov/AutosomalAvgCov ratio over .+", autosomal_ratio),
];

/// Multipliers and title prefixes for read and base counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CountUnits {
    pub read_multiplier: f64,
    pub read_prefix: CompactString,
    pub base_multiplier: f64,
    pub base_prefix: CompactString,
}

impl CountUnits {
    fn for_unit(&self, unit: &str) -> (f64, &str) {
        if unit.eq_ignore_ascii_case("reads") {
            (self.read_multiplier, self.read_prefix.as_str())
        } else {
            (self.base_multiplier, self.base_prefix.as_str())
        }
    }
}

impl Default for CountUnits {
    fn default() -> Self {
        Self {
            read_multiplier: 0.000_001,
            read_prefix: "M".into(),
            base_multiplier: 0.000_001,
            base_prefix: "Mb".into(),
        }
    }
}

/// A metric key together with the header it registers.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleColumn {
    pub key: CompactString,
    pub header: HeaderConfig,
}

/// The columns a matched metric name produces.
///
/// `second` is set for names whose lines carry a count and a percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub first: RuleColumn,
    pub second: Option<RuleColumn>,
}

impl RuleMatch {
    fn single(first: RuleColumn) -> Self {
        Self { first, second: None }
    }
}

/// Find the first coverage rule matching `metric` and build its columns.
///
/// The captured text is lowercased, so spellings that differ only in case share a key.
#[must_use]
pub fn match_coverage_metric(metric: &str, units: &CountUnits) -> Option<RuleMatch> {
    COVERAGE_RULES.iter().find_map(|(regex, template)| {
        let captures = regex.captures(metric)?;
        let x = captures.get(1).map_or_else(String::new, |m| m.as_str().to_lowercase());
        Some(template(&x, units))
    })
}

fn column(key: impl Into<CompactString>, title: impl Into<CompactString>, description: impl Into<CompactString>) -> RuleColumn {
    let mut header = HeaderConfig::section_defaults(Section::CoverageSummary);
    header.title = title.into();
    header.description = description.into();
    RuleColumn { key: key.into(), header }
}

fn depth_column(key: impl Into<CompactString>, title: impl Into<CompactString>, description: impl Into<CompactString>) -> RuleColumn {
    let mut col = column(key, title, description);
    col.header.scale = Some(ColorScale::Blues);
    col.header.suffix = " x";
    col
}

fn aligned_total(x: &str, units: &CountUnits) -> RuleMatch {
    let (multiplier, prefix) = units.for_unit(x);
    let mut col = column(
        format_compact!("Aligned {x}."),
        format_compact!("{prefix} Aln {x}"),
        format_compact!("Total number of aligned {x}."),
    );
    col.header.scale = Some(if x.eq_ignore_ascii_case("bases") { ColorScale::RdYlGn } else { ColorScale::Greys });
    col.header.format = NumberFormat::grouped(0);
    col.header.modify = Modify::Scale(multiplier);
    RuleMatch::single(col)
}

fn aligned_in_region(x: &str, units: &CountUnits) -> RuleMatch {
    let (multiplier, prefix) = units.for_unit(x);
    let bases = x.eq_ignore_ascii_case("bases");

    let mut count = column(
        format_compact!("Aligned {x} in region."),
        format_compact!("{prefix} Aln {x} on trg"),
        if bases {
            "Number of uniquely mapped bases to region."
        } else {
            "Number of uniquely mapped reads to region. When region is the target BED, this metric is equivalent to and replaces Capture Specificity based on target region."
        },
    );
    count.header.scale = Some(if bases { ColorScale::RdGy } else { ColorScale::RdYlGn });
    count.header.format = NumberFormat::grouped(0);
    count.header.modify = Modify::Scale(multiplier);
    count.header.hidden = true;

    let mut percentage = column(
        format_compact!("Percentage of aligned {x} in region."),
        format_compact!("Aln {x} on trg %"),
        if bases {
            "Percentage relative to the number of uniquely mapped bases to the genome."
        } else {
            "Percentage relative to the number of uniquely mapped reads to the genome. When region is the target BED, this metric is equivalent to and replaces Capture Specificity based on target region."
        },
    );
    percentage.header.scale = Some(if bases { ColorScale::Greys } else { ColorScale::Greens });
    percentage.header.format = NumberFormat::grouped(0);
    percentage.header.suffix = " %";
    percentage.header.max = Some(100.0);
    percentage.header.hidden = true;

    RuleMatch {
        first: count,
        second: Some(percentage),
    }
}

fn average_alignment_coverage(_: &str, _: &CountUnits) -> RuleMatch {
    RuleMatch::single(depth_column(
        "Average alignment coverage over region.",
        "Depth",
        "Number of uniquely mapped bases to region divided by the number of sites in region.",
    ))
}

fn uniformity(x: &str, _: &CountUnits) -> RuleMatch {
    let title = PCT_REGEX
        .captures(x)
        .and_then(|c| c.get(1))
        .map_or(x, |m| m.as_str())
        .replace(' ', "");

    let mut col = column(
        format_compact!("Uniformity of coverage {x} over region"),
        title,
        "Percentage of sites with coverage greater than % of the mean coverage in region.",
    );
    col.header.scale = Some(ColorScale::RdBu);
    col.header.suffix = " %";
    RuleMatch::single(col)
}

fn pct_with_coverage(x: &str, _: &CountUnits) -> RuleMatch {
    let lower = LOWER_BOUND_REGEX.captures(x).and_then(|c| c.get(1)).map(|m| m.as_str());
    let upper = UPPER_BOUND_REGEX.captures(x).and_then(|c| c.get(1)).map(|m| m.as_str());
    let description = match (lower, upper) {
        (Some(lower), Some(upper)) => {
            format_compact!("Percentage of sites in region with at least {lower}x but less than {upper} coverage.")
        }
        _ => format_compact!("Percentage of sites in region with coverage {x}."),
    };

    let mut col = column(format_compact!("PCT of region with coverage {x}"), x.replace(' ', ""), description);
    col.header.scale = Some(ColorScale::RdBu);
    col.header.suffix = " %";
    RuleMatch::single(col)
}

fn average_chromosome_coverage(x: &str, _: &CountUnits) -> RuleMatch {
    let short = match x {
        "chr x" => "X",
        "chr y" => "Y",
        "mitochondrial" => "mit",
        _ => "aut",
    };

    RuleMatch::single(depth_column(
        format_compact!("Average {x} coverage over region."),
        format_compact!("Avg {short} cov"),
        format_compact!(
            "Total number of bases that aligned to the intersection of {x} with region divided by the total number of loci in that intersection. Shows as NA when the reference genome has no such loci in region."
        ),
    ))
}

fn median_autosomal_coverage(_: &str, _: &CountUnits) -> RuleMatch {
    RuleMatch::single(depth_column(
        "Median autosomal coverage over region.",
        "Med aut cov",
        "Median alignment coverage over the autosomal loci in region. If there is no autosome in the reference genome or the region does not intersect autosomes, this metric shows as NA.",
    ))
}

fn mean_median_ratio(_: &str, _: &CountUnits) -> RuleMatch {
    RuleMatch::single(column(
        "Mean/Median autosomal coverage ratio over region.",
        "Mean/Med aut cov",
        "Mean autosomal coverage in region divided by the median autosomal coverage in region. If there is no autosome in the reference genome or the region does not intersect autosomes, this metric shows as NA.",
    ))
}

fn x_y_ratio(_: &str, _: &CountUnits) -> RuleMatch {
    RuleMatch::single(column(
        "XAvgCov/YAvgCov ratio over region.",
        "XAvgCov/YAvgCov",
        "Average chromosome X alignment coverage in region divided by the average chromosome Y alignment coverage in region. If there is no chromosome X or chromosome Y in the reference genome or the region does not intersect chromosome X or Y, this metric shows as NA.",
    ))
}

fn autosomal_ratio(x: &str, _: &CountUnits) -> RuleMatch {
    let chromosome = x.to_ascii_uppercase();
    RuleMatch::single(column(
        format_compact!("{chromosome}AvgCov/AutosomalAvgCov ratio over region."),
        format_compact!("{chromosome}AvgCov/AutAvgCov"),
        format_compact!(
            "Average chromosome {chromosome} alignment coverage in region divided by the average autosomal alignment coverage in region."
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(metric: &str) -> RuleMatch {
        match_coverage_metric(metric, &CountUnits::default()).unwrap()
    }

    #[test]
    fn test_rule_patterns_compile() {
        assert_eq!(COVERAGE_RULES.len(), RULE_PATTERNS.len());
    }

    #[test]
    fn test_aligned_total() {
        let rule = matched("Aligned bases");
        assert_eq!(rule.first.key, "Aligned bases.");
        assert_eq!(rule.first.header.title, "Mb Aln bases");
        assert_eq!(rule.first.header.scale, Some(ColorScale::RdYlGn));
        assert!(!rule.first.header.hidden);
        assert!(rule.second.is_none());

        let rule = matched("Aligned reads");
        assert_eq!(rule.first.header.title, "M Aln reads");
        assert_eq!(rule.first.header.scale, Some(ColorScale::Greys));
    }

    #[test]
    fn test_aligned_total_uses_configured_units() {
        let units = CountUnits {
            read_multiplier: 0.001,
            read_prefix: "K".into(),
            ..CountUnits::default()
        };
        let rule = match_coverage_metric("Aligned reads", &units).unwrap();
        assert_eq!(rule.first.header.title, "K Aln reads");
        assert_eq!(rule.first.header.modify, Modify::Scale(0.001));
    }

    #[test]
    fn test_aligned_in_region_has_two_columns() {
        let rule = matched("Aligned reads in QC coverage region");
        assert_eq!(rule.first.key, "Aligned reads in region.");
        assert_eq!(rule.first.header.title, "M Aln reads on trg");
        assert!(rule.first.header.hidden);

        let percentage = rule.second.unwrap();
        assert_eq!(percentage.key, "Percentage of aligned reads in region.");
        assert_eq!(percentage.header.title, "Aln reads on trg %");
        assert_eq!(percentage.header.suffix, " %");
        assert_eq!(percentage.header.max, Some(100.0));
        assert_eq!(percentage.header.modify, Modify::Identity);
    }

    #[test]
    fn test_first_match_wins() {
        // "Aligned bases" alone must not fall through to the in-region rule
        assert!(matched("Aligned bases").second.is_none());
        assert!(matched("Aligned bases in target region").second.is_some());
    }

    #[test]
    fn test_average_alignment_coverage() {
        let rule = matched("Average alignment coverage over target region");
        assert_eq!(rule.first.key, "Average alignment coverage over region.");
        assert_eq!(rule.first.header.title, "Depth");
        assert_eq!(rule.first.header.suffix, " x");
    }

    #[test]
    fn test_uniformity_title() {
        let rule = matched("Uniformity of coverage (PCT > 0.2*mean) over genome");
        assert_eq!(rule.first.key, "Uniformity of coverage pct > 0.2*mean over region");
        assert_eq!(rule.first.header.title, ">0.2*mean");
    }

    #[test]
    fn test_pct_with_coverage() {
        let rule = matched("PCT of genome with coverage [ 20x: inf)");
        assert_eq!(rule.first.key, "PCT of region with coverage [ 20x: inf)");
        assert_eq!(rule.first.header.title, "[20x:inf)");
        assert_eq!(
            rule.first.header.description,
            "Percentage of sites in region with at least 20x but less than inf coverage."
        );
    }

    #[test]
    fn test_average_chromosome_coverage_titles() {
        assert_eq!(matched("Average chr X coverage over genome").first.header.title, "Avg X cov");
        assert_eq!(matched("Average chr Y coverage over genome").first.header.title, "Avg Y cov");
        assert_eq!(matched("Average mitochondrial coverage over genome").first.header.title, "Avg mit cov");
        assert_eq!(matched("Average autosomal coverage over genome").first.header.title, "Avg aut cov");
    }

    #[test]
    fn test_ratio_rules() {
        assert_eq!(matched("Median autosomal coverage over genome").first.header.title, "Med aut cov");
        assert_eq!(matched("Mean/Median autosomal coverage ratio over genome").first.header.title, "Mean/Med aut cov");
        assert_eq!(matched("XAvgCov/YAvgCov ratio over genome").first.header.title, "XAvgCov/YAvgCov");
        let rule = matched("YAvgCov/AutosomalAvgCov ratio over genome");
        assert_eq!(rule.first.key, "YAvgCov/AutosomalAvgCov ratio over region.");
        assert_eq!(rule.first.header.title, "YAvgCov/AutAvgCov");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(matched("aligned BASES").first.key, "Aligned bases.");
        assert_eq!(matched("aligned BASES").first.header.title, "Mb Aln bases");
    }

    #[test]
    fn test_case_variants_share_a_key() {
        let keys = |metric: &str| {
            let rule = matched(metric);
            (rule.first.key, rule.second.map(|c| c.key))
        };
        assert_eq!(keys("Aligned Reads in target region"), keys("ALIGNED READS IN TARGET REGION"));
        assert_eq!(
            keys("Average Chr X coverage over genome"),
            keys("Average chr x coverage over genome")
        );
        assert_eq!(
            keys("Uniformity of coverage (pct > 0.2*MEAN) over genome"),
            keys("Uniformity of coverage (PCT > 0.2*mean) over genome")
        );
    }

    #[test]
    fn test_unmatched_metric() {
        assert!(match_coverage_metric("Something else entirely", &CountUnits::default()).is_none());
    }
}
