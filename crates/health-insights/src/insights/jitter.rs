//! Presentation jitter.
//!
//! Nudges the admissions and pollution values of a filtered series so that
//! repeated selections do not render perfectly flat charts. The perturbation
//! is cosmetic: numbers that went through [`apply_jitter`] must not be used
//! for analysis.

use super::filter::FilteredHealthSeries;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_JITTER_SEED: u64 = 42;

const ADMISSION_FACTOR: (f64, f64) = (0.95, 1.05);
const POLLUTION_OFFSET: (f64, f64) = (-0.5, 0.5);

/// Generator for [`apply_jitter`]; a fresh one per render keeps the output
/// reproducible for a given seed.
pub fn jitter_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Returns a jittered copy of `series`.
///
/// All admission factors are drawn first, in row order, then all pollution
/// offsets. Admission counts are rounded half to even after scaling.
pub fn apply_jitter<R: Rng>(
    series: &FilteredHealthSeries,
    rng: &mut R,
) -> FilteredHealthSeries {
    let factors: Vec<f64> = series
        .rows
        .iter()
        .map(|_| uniform(&mut *rng, ADMISSION_FACTOR))
        .collect();
    let offsets: Vec<f64> = series
        .rows
        .iter()
        .map(|_| uniform(&mut *rng, POLLUTION_OFFSET))
        .collect();

    let mut jittered = series.clone();
    for ((row, factor), offset) in jittered.rows.iter_mut().zip(factors).zip(offsets) {
        row.record.admission_count = (row.record.admission_count * factor).round_ties_even();
        row.record.avg_pollution += offset;
    }
    jittered
}

/// One draw on `[low, high)`.
fn uniform<R: Rng>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    low + (high - low) * rng.gen::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FilterSelection, HealthRecord};
    use crate::insights::filter_health;

    fn series(len: u32) -> FilteredHealthSeries {
        let data: Vec<HealthRecord> = (1..=len)
            .map(|month| HealthRecord {
                year: 2023,
                month,
                city: "Leeds".to_string(),
                diagnosis_group: "Respiratory".to_string(),
                admission_count: 100.0 + f64::from(month) * 17.0,
                avg_pollution: 20.0 + f64::from(month),
            })
            .collect();
        filter_health(&data, &FilterSelection::new(2023, "Leeds", "Respiratory"))
    }

    #[test]
    fn same_seed_gives_identical_output() {
        let input = series(12);
        let first = apply_jitter(&input, &mut jitter_rng(DEFAULT_JITTER_SEED));
        let second = apply_jitter(&input, &mut jitter_rng(DEFAULT_JITTER_SEED));

        for (a, b) in first.rows.iter().zip(&second.rows) {
            assert_eq!(
                a.record.admission_count.to_bits(),
                b.record.admission_count.to_bits()
            );
            assert_eq!(
                a.record.avg_pollution.to_bits(),
                b.record.avg_pollution.to_bits()
            );
        }
    }

    #[test]
    fn different_seeds_change_pollution() {
        let input = series(12);
        let a = apply_jitter(&input, &mut jitter_rng(1));
        let b = apply_jitter(&input, &mut jitter_rng(2));
        assert!(a
            .rows
            .iter()
            .zip(&b.rows)
            .any(|(x, y)| x.record.avg_pollution != y.record.avg_pollution));
    }

    #[test]
    fn values_stay_within_bounds() {
        let input = series(12);
        let output = apply_jitter(&input, &mut jitter_rng(7));

        for (before, after) in input.rows.iter().zip(&output.rows) {
            let original = before.record.admission_count;
            // rounding can move the value by at most half a unit
            assert!(after.record.admission_count >= (original * 0.95 - 0.5).floor());
            assert!(after.record.admission_count <= (original * 1.05 + 0.5).ceil());
            assert_eq!(after.record.admission_count.fract(), 0.0);

            let delta = after.record.avg_pollution - before.record.avg_pollution;
            assert!(delta.abs() <= 0.5 + 1e-9, "offset {delta} out of range");
        }
    }

    #[test]
    fn preserves_order_dates_and_input() {
        let input = series(6);
        let snapshot = input.clone();
        let output = apply_jitter(&input, &mut jitter_rng(DEFAULT_JITTER_SEED));

        assert_eq!(input, snapshot);
        assert_eq!(output.len(), input.len());
        assert!(output
            .rows
            .iter()
            .zip(&input.rows)
            .all(|(a, b)| a.date == b.date && a.record.month == b.record.month));
    }

    #[test]
    fn empty_series_consumes_nothing() {
        let empty = series(0);
        let output = apply_jitter(&empty, &mut jitter_rng(DEFAULT_JITTER_SEED));
        assert!(output.is_empty());
    }
}
