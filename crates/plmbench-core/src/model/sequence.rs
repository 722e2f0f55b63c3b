use super::error::ModelError;

/// Placeholder for a residue the model should fill in.
pub const MASK_TOKEN: char = '_';

pub fn count_masked(sequence: &str) -> usize {
    sequence.chars().filter(|&c| c == MASK_TOKEN).count()
}

/// Fraction of positions that are masked; 0.0 for an empty sequence.
pub fn mask_fraction(sequence: &str) -> f64 {
    let total = sequence.chars().count();
    if total == 0 {
        return 0.0;
    }
    count_masked(sequence) as f64 / total as f64
}

/// Fraction of positions where `predicted` matches `reference`.
pub fn recovery(predicted: &str, reference: &str) -> Result<f64, ModelError> {
    let predicted: Vec<char> = predicted.chars().collect();
    let reference: Vec<char> = reference.chars().collect();
    check_lengths(predicted.len(), reference.len())?;
    if reference.is_empty() {
        return Ok(0.0);
    }
    let identical = predicted
        .iter()
        .zip(&reference)
        .filter(|(p, r)| p.eq_ignore_ascii_case(r))
        .count();
    Ok(identical as f64 / reference.len() as f64)
}

/// Recovery restricted to the positions masked in `masked_input`. Returns `None` when
/// nothing was masked.
pub fn masked_recovery(
    masked_input: &str,
    predicted: &str,
    reference: &str,
) -> Result<Option<f64>, ModelError> {
    let masked: Vec<char> = masked_input.chars().collect();
    let predicted: Vec<char> = predicted.chars().collect();
    let reference: Vec<char> = reference.chars().collect();
    check_lengths(predicted.len(), reference.len())?;
    check_lengths(masked.len(), reference.len())?;

    let (hits, total) = masked
        .iter()
        .zip(predicted.iter().zip(&reference))
        .filter(|(m, _)| **m == MASK_TOKEN)
        .fold((0usize, 0usize), |(hits, total), (_, (p, r))| {
            (hits + usize::from(p.eq_ignore_ascii_case(r)), total + 1)
        });

    Ok((total > 0).then(|| hits as f64 / total as f64))
}

fn check_lengths(left: usize, right: usize) -> Result<(), ModelError> {
    if left != right {
        return Err(ModelError::SequenceLengthMismatch { left, right });
    }
    Ok(())
}
