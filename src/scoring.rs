use crate::models::{MeritRange, MeritRecord, MeritScore};

/// Largest merit value in the whole table, `None` when the table is empty.
pub fn global_max_merit(merit_records: &[MeritRecord]) -> Option<f64> {
    merit_records
        .iter()
        .map(|record| record.merit)
        .fold(None, |max, merit| match max {
            Some(current) if current >= merit => Some(current),
            _ => Some(merit),
        })
}

/// Median of the values, averaging the middle pair for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn merit_range(merit_rows: &[&MeritRecord]) -> Option<MeritRange> {
    let mut values = merit_rows.iter().map(|record| record.merit);
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(min, max), merit| {
        (min.min(merit), max.max(merit))
    });
    Some(MeritRange {
        min: min.floor() as i64,
        max: max.floor() as i64,
    })
}

/// Prestige score and merit range for one department's merit rows.
///
/// Lower merit positions are more competitive, so the score inverts the median
/// against the dataset-wide maximum and lands in `[0, 100]`. A non-positive
/// maximum leaves the score unavailable.
pub fn score(merit_rows: &[&MeritRecord], global_max_merit: Option<f64>) -> MeritScore {
    if merit_rows.is_empty() {
        return MeritScore::default();
    }

    let merits: Vec<f64> = merit_rows.iter().map(|record| record.merit).collect();
    let prestige_score = match (median(&merits), global_max_merit) {
        (Some(median_merit), Some(max)) if max > 0.0 && max.is_finite() => {
            Some((((max - median_merit) / max) * 100.0).clamp(0.0, 100.0))
        }
        _ => None,
    };

    MeritScore {
        prestige_score,
        merit_range: merit_range(merit_rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;

    fn merit(value: f64, unit: Unit) -> MeritRecord {
        MeritRecord {
            subject: "Computer Science and Engineering".to_string(),
            merit: value,
            unit,
            admission_cycle: "2223".to_string(),
        }
    }

    #[test]
    fn empty_rows_are_unavailable() {
        let result = score(&[], Some(100.0));
        assert_eq!(result.prestige_score, None);
        assert_eq!(result.merit_range, None);
    }

    #[test]
    fn merit_range_floors_instead_of_rounding() {
        let rows = [merit(12.7, Unit::A), merit(9.3, Unit::B), merit(15.0, Unit::C)];
        let refs: Vec<&MeritRecord> = rows.iter().collect();
        assert_eq!(merit_range(&refs), Some(MeritRange { min: 9, max: 15 }));
    }

    #[test]
    fn prestige_inverts_median_against_global_max() {
        let rows = [merit(50.0, Unit::A), merit(70.0, Unit::B)];
        let refs: Vec<&MeritRecord> = rows.iter().collect();
        let result = score(&refs, Some(100.0));
        assert_eq!(result.merit_range, Some(MeritRange { min: 50, max: 70 }));
        let prestige = result.prestige_score.unwrap();
        assert!((prestige - 40.0).abs() < 1e-9);
    }

    #[test]
    fn zero_global_max_leaves_score_unavailable() {
        let rows = [merit(0.0, Unit::A)];
        let refs: Vec<&MeritRecord> = rows.iter().collect();
        let result = score(&refs, Some(0.0));
        assert_eq!(result.prestige_score, None);
        assert_eq!(result.merit_range, Some(MeritRange { min: 0, max: 0 }));
    }

    #[test]
    fn median_handles_odd_and_even_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn global_max_scans_whole_table() {
        let rows = vec![merit(12.0, Unit::A), merit(480.5, Unit::D), merit(3.0, Unit::B)];
        assert_eq!(global_max_merit(&rows), Some(480.5));
        assert_eq!(global_max_merit(&[]), None);
    }
}
