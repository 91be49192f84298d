use super::{ColorScale, CondColor, CondPredicate, CondRule, HeaderConfig, Modify, NumberFormat, Rgb, Section};
use strsim::normalized_damerau_levenshtein;

const MIN_SUGGESTION_SCORE: f64 = 0.8;

const KARYOTYPE_RULES: &[CondRule] = &[
    CondRule::new(CondPredicate::StrEq("XX"), CondColor::Green),
    CondRule::new(CondPredicate::StrEq("XY"), CondColor::Green),
    CondRule::new(CondPredicate::StrEq("YX"), CondColor::Green),
    CondRule::new(CondPredicate::Otherwise, CondColor::Red),
];

const CONFIDENCE_RULES: &[CondRule] = &[
    CondRule::new(CondPredicate::Lt(0.0), CondColor::Red),
    CondRule::new(CondPredicate::Gt(1.0), CondColor::Red),
];

const GENOTYPE_COLOR: Rgb = Rgb::new(0, 255, 0);

/// A catalog entry overriding the section defaults for one metric key.
#[derive(Debug)]
pub struct MetricDef {
    pub section: Section,
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub customize: fn(&mut HeaderConfig),
}

macro_rules! metric_def {
    ($section:ident, $key:expr, $title:expr, $description:expr, $customize:expr) => {
        MetricDef {
            section: Section::$section,
            key: $key,
            title: $title,
            description: $description,
            customize: $customize,
        }
    };
}

/// Key of a line's second value, usable in constant position.
macro_rules! second_value {
    ($key:literal) => {
        concat!($key, "(second value)")
    };
}

pub const METRIC_DEFINITIONS: &[MetricDef] = &[
    metric_def!(
        SexGenotyper,
        "karyotype",
        "Kar",
        "Estimated sex karyotype for the sample.",
        |h| {
            h.min = None;
            h.color = GENOTYPE_COLOR;
            h.hidden = false;
            h.cond_formatting = KARYOTYPE_RULES;
        }
    ),
    metric_def!(
        SexGenotyper,
        "confidence",
        "KarConf",
        "Confidence metric ranging from 0.0 to 1.0. If the sample sex is specified, this metric is 0.0.",
        |h| {
            h.color = GENOTYPE_COLOR;
            h.hidden = false;
            h.max = Some(1.0);
            h.format = NumberFormat::grouped(3);
            h.suffix = " %";
            h.cond_formatting = CONFIDENCE_RULES;
        }
    ),
    metric_def!(
        CnvSummary,
        "bases in reference genome",
        "Mb bases",
        "Bases in reference genome in use.",
        |h| {
            h.scale = Some(ColorScale::RdYlGn);
            h.color = Rgb::new(0, 0, 255);
            h.format = NumberFormat::grouped(0);
            h.modify = Modify::MILLIONS;
        }
    ),
    metric_def!(
        CnvSummary,
        "average alignment coverage over genome",
        "AvgCov",
        "Average alignment coverage over genome.",
        |h| h.suffix = " x"
    ),
    metric_def!(
        CnvSummary,
        "number of alignment records",
        "M Aln records",
        "Number of alignment records processed.",
        |h| {
            h.format = NumberFormat::grouped(0);
            h.modify = Modify::MILLIONS;
        }
    ),
    metric_def!(
        CnvSummary,
        "coverage uniformity",
        "CovUnif",
        "Coverage uniformity.",
        |h| {
            h.suffix = " %";
            h.format = NumberFormat::grouped(2);
        }
    ),
    metric_def!(
        CnvSummary,
        "number of target intervals",
        "Trg intervals",
        "Number of target intervals.",
        |h| h.format = NumberFormat::grouped(0)
    ),
    metric_def!(
        CnvSummary,
        "number of normal samples",
        "Normal samples",
        "Number of normal samples in the panel.",
        |h| h.format = NumberFormat::grouped(0)
    ),
    metric_def!(
        CnvSummary,
        "number of segments",
        "Segments",
        "Number of segments.",
        |h| h.format = NumberFormat::grouped(0)
    ),
    metric_def!(
        CnvSummary,
        "number of filtered records (total)",
        "M Total",
        "Number of filtered records (total).",
        |h| {
            h.format = NumberFormat::grouped(2);
            h.modify = Modify::MILLIONS;
        }
    ),
    metric_def!(
        CnvSummary,
        second_value!("number of filtered records (total)"),
        "Total%",
        "Percentage of filtered records (total).",
        |h| h.suffix = " %"
    ),
    metric_def!(
        CnvSummary,
        "number of filtered records (duplicates)",
        "M Duplicates",
        "Number of filtered records (due to duplicates).",
        |h| {
            h.format = NumberFormat::grouped(2);
            h.modify = Modify::MILLIONS;
        }
    ),
    metric_def!(
        CnvSummary,
        second_value!("number of filtered records (duplicates)"),
        "Duplicates%",
        "Percentage of filtered records (due to duplicates).",
        |h| h.suffix = " %"
    ),
    metric_def!(
        CnvSummary,
        "number of filtered records (mapq)",
        "M MAPQ",
        "Number of filtered records (due to MAPQ).",
        |h| {
            h.format = NumberFormat::grouped(2);
            h.modify = Modify::MILLIONS;
        }
    ),
    metric_def!(
        CnvSummary,
        second_value!("number of filtered records (mapq)"),
        "MAPQ%",
        "Percentage of filtered records (due to MAPQ).",
        |h| h.suffix = " %"
    ),
    metric_def!(
        CnvSummary,
        "number of filtered records (unmapped)",
        "M Unmapped",
        "Number of filtered records (due to being unmapped).",
        |h| {
            h.format = NumberFormat::grouped(2);
            h.modify = Modify::MILLIONS;
        }
    ),
    metric_def!(
        CnvSummary,
        second_value!("number of filtered records (unmapped)"),
        "Unmapped%",
        "Percentage of filtered records (due to being unmapped).",
        |h| h.suffix = " %"
    ),
    metric_def!(
        CnvSummary,
        "number of amplifications",
        "Amplifs",
        "Number of amplifications.",
        |h| h.format = NumberFormat::grouped(0)
    ),
    metric_def!(
        CnvSummary,
        "number of passing amplifications",
        "Amplifs PASS",
        "Number of PASS amplifications.",
        |h| h.format = NumberFormat::grouped(0)
    ),
    metric_def!(
        CnvSummary,
        second_value!("number of passing amplifications"),
        "Amplifs PASS%",
        "Percentage of PASS amplifications.",
        |h| h.suffix = " %"
    ),
    metric_def!(
        CnvSummary,
        "number of deletions",
        "Deletions",
        "Number of deletions.",
        |h| h.format = NumberFormat::grouped(0)
    ),
    metric_def!(
        CnvSummary,
        "number of passing deletions",
        "Deletions PASS",
        "Number of PASS deletions.",
        |h| h.format = NumberFormat::grouped(0)
    ),
    metric_def!(
        CnvSummary,
        second_value!("number of passing deletions"),
        "Deletions PASS%",
        "Percentage of PASS deletions.",
        |h| h.suffix = " %"
    ),
    metric_def!(
        CnvSummary,
        "number of de novo calls",
        "de Novo",
        "Number of de novo calls.",
        |h| h.format = NumberFormat::grouped(0)
    ),
    metric_def!(
        CnvSummary,
        "number of passing de novo calls",
        "de Novo PASS",
        "Number of passing de novo calls.",
        |h| h.format = NumberFormat::grouped(0)
    ),
    metric_def!(
        CnvSummary,
        second_value!("number of passing de novo calls"),
        "de Novo PASS%",
        "Percentage of passing de novo calls.",
        |h| h.suffix = " %"
    ),
];

#[must_use]
pub fn lookup(section: Section, key: &str) -> Option<&'static MetricDef> {
    METRIC_DEFINITIONS.iter().find(|def| def.section == section && def.key == key)
}

/// Build the header for a metric key: section defaults, then the catalog overlay.
///
/// Keys missing from the catalog use `raw_name` as title and description.
#[must_use]
pub fn header_for(section: Section, key: &str, raw_name: &str) -> HeaderConfig {
    let mut header = HeaderConfig::section_defaults(section);
    if let Some(def) = lookup(section, key) {
        header.title = def.title.into();
        header.description = def.description.into();
        (def.customize)(&mut header);
    }
    header.with_fallback_title(raw_name)
}

/// The closest catalog key in the section, if one is similar enough.
#[must_use]
pub fn suggest(section: Section, key: &str) -> Option<&'static str> {
    METRIC_DEFINITIONS
        .iter()
        .filter(|def| def.section == section)
        .map(|def| (def.key, normalized_damerau_levenshtein(key, def.key)))
        .filter(|(_, score)| *score >= MIN_SUGGESTION_SCORE)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(key, _)| key)
}
