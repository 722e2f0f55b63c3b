use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which external aligner(s) a comparison runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentMethod {
    #[default]
    UsAlign,
    TmAlign,
    All,
}

impl AlignmentMethod {
    /// Tools run for this method, in execution order.
    pub fn tools(&self) -> &'static [ExternalTool] {
        match self {
            AlignmentMethod::UsAlign => &[ExternalTool::UsAlign],
            AlignmentMethod::TmAlign => &[ExternalTool::TmAlign],
            AlignmentMethod::All => &[ExternalTool::TmAlign, ExternalTool::UsAlign],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown alignment method '{0}'. Expected 'us-align', 'tm-align' or 'all'.")]
pub struct ParseMethodError(pub String);

impl FromStr for AlignmentMethod {
    type Err = ParseMethodError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "us-align" | "usalign" => Ok(AlignmentMethod::UsAlign),
            "tm-align" | "tmalign" => Ok(AlignmentMethod::TmAlign),
            "all" => Ok(AlignmentMethod::All),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

/// An externally authored alignment program, built from its published C++ source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExternalTool {
    TmAlign,
    UsAlign,
}

impl ExternalTool {
    pub const ALL: [ExternalTool; 2] = [ExternalTool::TmAlign, ExternalTool::UsAlign];

    pub fn binary_name(&self) -> &'static str {
        match self {
            ExternalTool::TmAlign => "TMalign",
            ExternalTool::UsAlign => "USalign",
        }
    }

    pub fn source_url(&self) -> &'static str {
        match self {
            ExternalTool::TmAlign => "https://zhanggroup.org/TM-align/TMalign.cpp",
            ExternalTool::UsAlign => "https://zhanggroup.org/US-align/bin/module/USalign.cpp",
        }
    }

    pub fn source_file_name(&self) -> String {
        format!("{}.cpp", self.binary_name())
    }

    /// Arguments passed to `g++` to build the tool from `<binary>.cpp` into `<binary>`.
    pub fn compile_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["-static", "-O3", "-ffast-math"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        if matches!(self, ExternalTool::TmAlign) {
            args.push("-lm".to_string());
        }
        args.extend([
            "-o".to_string(),
            self.binary_name().to_string(),
            self.source_file_name(),
        ]);
        args
    }
}

impl fmt::Display for ExternalTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// Command-line switches shared by TM-align and US-align.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignerOptions {
    /// `-mm`: multimeric alignment mode (1 aligns complexes chain to chain).
    pub multimer_mode: Option<u8>,
    /// `-ter`: how many chains to read (0 reads every chain).
    pub ter_mode: Option<u8>,
    /// `-a T`: additionally report the TM-score normalized by the average length.
    pub average_length: bool,
    pub extra_args: Vec<String>,
}

impl Default for AlignerOptions {
    fn default() -> Self {
        Self {
            multimer_mode: Some(1),
            ter_mode: Some(0),
            average_length: false,
            extra_args: Vec::new(),
        }
    }
}

impl AlignerOptions {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(mm) = self.multimer_mode {
            args.extend(["-mm".to_string(), mm.to_string()]);
        }
        if let Some(ter) = self.ter_mode {
            args.extend(["-ter".to_string(), ter.to_string()]);
        }
        if self.average_length {
            args.extend(["-a".to_string(), "T".to_string()]);
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_runs_tm_align_before_us_align() {
        assert_eq!(
            AlignmentMethod::All.tools(),
            &[ExternalTool::TmAlign, ExternalTool::UsAlign]
        );
        assert_eq!(AlignmentMethod::default().tools(), &[ExternalTool::UsAlign]);
    }

    #[test]
    fn method_parses_common_spellings() {
        assert_eq!("us-align".parse::<AlignmentMethod>(), Ok(AlignmentMethod::UsAlign));
        assert_eq!("TMalign".parse::<AlignmentMethod>(), Ok(AlignmentMethod::TmAlign));
        assert_eq!("tm_align".parse::<AlignmentMethod>(), Ok(AlignmentMethod::TmAlign));
        assert_eq!("ALL".parse::<AlignmentMethod>(), Ok(AlignmentMethod::All));
        assert_eq!(
            "dali".parse::<AlignmentMethod>(),
            Err(ParseMethodError("dali".to_string()))
        );
    }

    #[test]
    fn default_options_match_fixed_invocation_flags() {
        assert_eq!(
            AlignerOptions::default().to_args(),
            vec!["-mm", "1", "-ter", "0"]
        );
    }

    #[test]
    fn average_length_and_extra_args_are_appended() {
        let options = AlignerOptions {
            multimer_mode: None,
            ter_mode: None,
            average_length: true,
            extra_args: vec!["-byresi".to_string(), "1".to_string()],
        };
        assert_eq!(options.to_args(), vec!["-a", "T", "-byresi", "1"]);
    }

    #[test]
    fn compile_args_build_from_source_file() {
        assert_eq!(
            ExternalTool::TmAlign.compile_args(),
            vec!["-static", "-O3", "-ffast-math", "-lm", "-o", "TMalign", "TMalign.cpp"]
        );
        assert_eq!(
            ExternalTool::UsAlign.compile_args(),
            vec!["-static", "-O3", "-ffast-math", "-o", "USalign", "USalign.cpp"]
        );
    }
}
