use super::error::DatasetError;
use std::fmt;
use std::str::FromStr;

/// A single point substitution such as `A123G`: wild-type residue, 1-based position,
/// mutant residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mutation {
    pub wild_type: char,
    pub position: usize,
    pub mutant: char,
}

impl Mutation {
    /// Returns `sequence` with the substitution applied, after checking that the residue at
    /// the position is the expected wild type.
    pub fn apply(&self, sequence: &str) -> Result<String, DatasetError> {
        let mut residues: Vec<char> = sequence.chars().collect();
        let index = self.position - 1;
        let Some(found) = residues.get(index).copied() else {
            return Err(DatasetError::MutationMismatch {
                code: self.to_string(),
                reason: format!("position {} exceeds sequence length {}", self.position, residues.len()),
            });
        };
        if found != self.wild_type {
            return Err(DatasetError::MutationMismatch {
                code: self.to_string(),
                reason: format!("expected '{}' at position {}, found '{}'", self.wild_type, self.position, found),
            });
        }
        residues[index] = self.mutant;
        Ok(residues.into_iter().collect())
    }
}

impl FromStr for Mutation {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let invalid = || DatasetError::InvalidMutation(s.to_string());

        let mut chars = code.chars();
        let wild_type = chars.next().filter(|c| c.is_ascii_alphabetic()).ok_or_else(invalid)?;
        let mutant = chars.next_back().filter(|c| c.is_ascii_alphabetic()).ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let position: usize = digits.parse().map_err(|_| invalid())?;
        if position == 0 {
            return Err(invalid());
        }

        Ok(Self {
            wild_type: wild_type.to_ascii_uppercase(),
            position,
            mutant: mutant.to_ascii_uppercase(),
        })
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.wild_type, self.position, self.mutant)
    }
}
