use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FastaError {
    #[error("FASTA input contains no records")]
    Empty,
    #[error("Sequence data on line {line} appears before any '>' header")]
    MissingHeader { line: usize },
    #[error("Record '{header}' has an empty sequence")]
    EmptySequence { header: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// The first whitespace-delimited token of the header, conventionally the identifier.
    pub fn id(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }

    /// Formats the record with the sequence wrapped at `width` residues per line. A width
    /// of zero writes the sequence on a single line.
    pub fn to_fasta_string(&self, width: usize) -> String {
        let mut out = format!(">{}\n", self.header);
        if width == 0 {
            out.push_str(&self.sequence);
            out.push('\n');
            return out;
        }
        let bytes = self.sequence.as_bytes();
        for chunk in bytes.chunks(width) {
            out.push_str(&String::from_utf8_lossy(chunk));
            out.push('\n');
        }
        out
    }
}

/// Parses every record of a FASTA document.
///
/// Wrapped sequence lines are joined, whitespace is removed, and a trailing `*` stop
/// symbol is dropped. Blank lines and `;` comment lines are ignored.
pub fn parse_fasta(contents: &str) -> Result<Vec<FastaRecord>, FastaError> {
    let mut records: Vec<FastaRecord> = Vec::new();

    for (index, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            records.push(FastaRecord::new(header.trim(), String::new()));
            continue;
        }
        match records.last_mut() {
            Some(record) => record
                .sequence
                .extend(line.chars().filter(|c| !c.is_whitespace())),
            None => return Err(FastaError::MissingHeader { line: index + 1 }),
        }
    }

    if records.is_empty() {
        return Err(FastaError::Empty);
    }

    for record in &mut records {
        if record.sequence.ends_with('*') {
            record.sequence.pop();
        }
        if record.sequence.is_empty() {
            return Err(FastaError::EmptySequence {
                header: record.header.clone(),
            });
        }
    }

    Ok(records)
}

/// Returns the sequence of the first record.
pub fn first_sequence(contents: &str) -> Result<String, FastaError> {
    parse_fasta(contents)?
        .into_iter()
        .next()
        .map(|r| r.sequence)
        .ok_or(FastaError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_joins_wrapped_lines_and_strips_stop_symbol() {
        let contents = ">T0949 some target\nMKVLA\nGGHH*\n";
        let records = parse_fasta(contents).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "T0949");
        assert_eq!(records[0].header, "T0949 some target");
        assert_eq!(records[0].sequence, "MKVLAGGHH");
    }

    #[test]
    fn parse_reads_multiple_records_and_ignores_comments() {
        let contents = "; comment\n>a\nAC\n\n>b\nDE\r\nF\n";
        let records = parse_fasta(contents).unwrap();
        assert_eq!(
            records,
            vec![FastaRecord::new("a", "AC"), FastaRecord::new("b", "DEF")]
        );
    }

    #[test]
    fn parse_rejects_sequence_before_header() {
        assert_eq!(
            parse_fasta("MKV\n>a\nAC\n"),
            Err(FastaError::MissingHeader { line: 1 })
        );
    }

    #[test]
    fn parse_rejects_empty_input_and_empty_sequences() {
        assert_eq!(parse_fasta("\n\n"), Err(FastaError::Empty));
        assert_eq!(
            parse_fasta(">a\n>b\nAC\n"),
            Err(FastaError::EmptySequence {
                header: "a".to_string()
            })
        );
    }

    #[test]
    fn first_sequence_returns_leading_record() {
        assert_eq!(first_sequence(">x\nAAA\n>y\nCCC\n").unwrap(), "AAA");
    }

    #[test]
    fn to_fasta_string_wraps_at_width() {
        let record = FastaRecord::new("id", "ABCDEFG");
        assert_eq!(record.to_fasta_string(3), ">id\nABC\nDEF\nG\n");
        assert_eq!(record.to_fasta_string(0), ">id\nABCDEFG\n");
    }
}
