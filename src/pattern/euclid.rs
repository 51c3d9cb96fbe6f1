//! Bjorklund's algorithm for Euclidean rhythm generation.

use crate::error::{PatternError, Result};

/// Distribute `pulses` onsets as evenly as possible across `steps` slots,
/// then rotate the result left by `rotation % steps` positions.
///
/// Returns a boolean sequence of length `steps` with exactly `pulses` true
/// entries. `pulses > steps` and `steps == 0` are invalid. O(steps).
pub fn euclid(pulses: usize, steps: usize, rotation: usize) -> Result<Vec<bool>> {
    if steps == 0 || pulses > steps {
        return Err(PatternError::Rhythm { pulses, steps });
    }
    if pulses == 0 {
        return Ok(vec![false; steps]);
    }
    if pulses == steps {
        return Ok(vec![true; steps]);
    }

    // Bjorklund: repeatedly fold the remainder groups into the pattern
    // groups until at most one remainder group is left.
    let mut pattern: Vec<Vec<bool>> = vec![vec![true]; pulses];
    let mut remainder: Vec<Vec<bool>> = vec![vec![false]; steps - pulses];

    while remainder.len() > 1 {
        let take = pattern.len().min(remainder.len());
        let mut folded = Vec::with_capacity(take);

        for (group, rem) in pattern.iter().take(take).zip(remainder.iter().take(take)) {
            let mut combined = group.clone();
            combined.extend(rem.iter().copied());
            folded.push(combined);
        }

        let leftover_pattern: Vec<_> = pattern.into_iter().skip(take).collect();
        let leftover_remainder: Vec<_> = remainder.into_iter().skip(take).collect();

        pattern = folded;
        remainder = if leftover_pattern.is_empty() {
            leftover_remainder
        } else {
            leftover_pattern
        };
    }

    let mut onsets: Vec<bool> = Vec::with_capacity(steps);
    for group in pattern.into_iter().chain(remainder) {
        onsets.extend(group);
    }

    let r = rotation % steps;
    onsets.rotate_left(r);
    Ok(onsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn onset_positions(seq: &[bool]) -> Vec<usize> {
        seq.iter()
            .enumerate()
            .filter_map(|(i, on)| on.then_some(i))
            .collect()
    }

    #[test]
    fn test_tresillo() {
        let seq = euclid(3, 8, 0).unwrap();
        assert_eq!(onset_positions(&seq), vec![0, 3, 6]);
    }

    #[test]
    fn test_degenerate_cases() {
        assert_eq!(euclid(0, 4, 0).unwrap(), vec![false; 4]);
        assert_eq!(euclid(4, 4, 0).unwrap(), vec![true; 4]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            euclid(5, 4, 0),
            Err(PatternError::Rhythm { pulses: 5, steps: 4 })
        );
        assert_eq!(
            euclid(1, 0, 0),
            Err(PatternError::Rhythm { pulses: 1, steps: 0 })
        );
    }

    #[test]
    fn test_rotation() {
        let seq = euclid(3, 8, 3).unwrap();
        // Tresillo rotated left by 3: onsets at {0, 3, 5}.
        assert_eq!(onset_positions(&seq), vec![0, 3, 5]);
        // Rotation wraps modulo the step count.
        assert_eq!(euclid(3, 8, 11).unwrap(), euclid(3, 8, 3).unwrap());
    }

    #[test]
    fn test_pulse_count_and_even_spread() {
        for steps in 1..=16usize {
            for pulses in 0..=steps {
                let seq = euclid(pulses, steps, 0).unwrap();
                assert_eq!(seq.len(), steps);
                assert_eq!(seq.iter().filter(|&&b| b).count(), pulses);

                // No two onset-to-onset gaps differ by more than one step.
                let pos = onset_positions(&seq);
                if pos.len() >= 2 {
                    let gaps: Vec<usize> = pos
                        .windows(2)
                        .map(|w| w[1] - w[0])
                        .chain(std::iter::once(steps - pos[pos.len() - 1] + pos[0]))
                        .collect();
                    let min = gaps.iter().min().unwrap();
                    let max = gaps.iter().max().unwrap();
                    assert!(max - min <= 1, "uneven gaps for ({pulses},{steps}): {gaps:?}");
                }
            }
        }
    }
}
