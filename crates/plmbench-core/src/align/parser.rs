use regex::Regex;
use std::sync::LazyLock;

static TM_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"TM-score\s*[=:]\s*([0-9]*\.?[0-9]+)").expect("TM-score pattern is valid")
});

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Aligned length=\s*(\d+),\s*RMSD=\s*([0-9.]+),\s*Seq_ID=n_identical/n_aligned=\s*([0-9.]+)",
    )
    .expect("summary pattern is valid")
});

static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Length of (?:Chain|Structure)_([12]):\s*(\d+)\s*residues")
        .expect("length pattern is valid")
});

/// Values extracted from a TM-align or US-align report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentReport {
    /// Every TM-score in order of appearance: normalized by structure 1, by structure 2,
    /// and (with `-a T`) by the average length.
    pub tm_scores: Vec<f64>,
    pub aligned_length: Option<usize>,
    pub rmsd: Option<f64>,
    pub sequence_identity: Option<f64>,
    pub length1: Option<usize>,
    pub length2: Option<usize>,
}

impl AlignmentReport {
    pub fn score1(&self) -> Option<f64> {
        self.tm_scores.first().copied()
    }

    pub fn score2(&self) -> Option<f64> {
        self.tm_scores.get(1).copied()
    }

    pub fn average_length_score(&self) -> Option<f64> {
        self.tm_scores.get(2).copied()
    }
}

/// Parses the textual report an aligner prints to stdout.
///
/// Unparseable numbers are skipped rather than reported; the caller decides how many
/// scores it needs.
pub fn parse_alignment_output(stdout: &str) -> AlignmentReport {
    let tm_scores = TM_SCORE
        .captures_iter(stdout)
        .filter_map(|c| c[1].parse().ok())
        .collect();

    let mut report = AlignmentReport {
        tm_scores,
        ..Default::default()
    };

    if let Some(c) = SUMMARY.captures(stdout) {
        report.aligned_length = c[1].parse().ok();
        report.rmsd = c[2].parse().ok();
        report.sequence_identity = c[3].parse().ok();
    }

    for c in LENGTH.captures_iter(stdout) {
        let length = c[2].parse().ok();
        match &c[1] {
            "1" => report.length1 = length,
            _ => report.length2 = length,
        }
    }

    report
}
