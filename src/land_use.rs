use crate::error::Error;
use crate::inputs::LandUseRow;

// Largest gap between a row sum and 100 that is treated as rounding error.
const IMBALANCE_TOLERANCE: f64 = 5.0;

/**
Repair rounding error in the land-use rows.

Each row must describe the whole catchment, so its seven fractions have to
sum to 100. Gaps of up to five points either way are folded into the
remainder category `a7`, leaving every row at exactly 100. A larger gap is
a data-entry problem and aborts the calculation with the offending row's
1-based index.

This runs before any accumulation that reads the fractions.

# Errors
[`Error::LandUseImbalance`] when a row is off by more than five points.
*/
pub fn normalize_land_use(rows: &mut [LandUseRow]) -> Result<(), Error> {
    for (index, row) in rows.iter_mut().enumerate() {
        let deficit = 100.0 - row.sum();
        if deficit.abs() > IMBALANCE_TOLERANCE {
            return Err(Error::LandUseImbalance {
                row: index + 1,
                sum: row.sum(),
            });
        }
        row.a7 += deficit;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(a7: f64) -> LandUseRow {
        LandUseRow {
            a1: 20.0,
            a2: 20.0,
            a3: 15.0,
            a4: 15.0,
            a5: 10.0,
            a6: 10.0,
            a7,
        }
    }

    #[test]
    fn small_deficit_is_added_to_the_remainder() {
        let mut rows = vec![row(6.0)]; // sums to 96
        normalize_land_use(&mut rows).unwrap();
        assert_relative_eq!(rows[0].a7, 10.0);
        assert_relative_eq!(rows[0].sum(), 100.0);
    }

    #[test]
    fn small_excess_is_taken_from_the_remainder() {
        let mut rows = vec![row(13.0)]; // sums to 103
        normalize_land_use(&mut rows).unwrap();
        assert_relative_eq!(rows[0].a7, 10.0);
        assert_relative_eq!(rows[0].sum(), 100.0);
    }

    #[test]
    fn balanced_rows_are_untouched() {
        let mut rows = vec![row(10.0)];
        normalize_land_use(&mut rows).unwrap();
        assert_relative_eq!(rows[0].a7, 10.0);
    }

    #[test]
    fn a_large_gap_names_the_offending_row() {
        let mut rows = vec![row(10.0), row(-20.0)]; // second row sums to 70
        let err = normalize_land_use(&mut rows).unwrap_err();
        match err {
            Error::LandUseImbalance { row, sum } => {
                assert_eq!(row, 2);
                assert_relative_eq!(sum, 70.0);
            }
            other => panic!("expected LandUseImbalance, got {other:?}"),
        }
    }

    #[test]
    fn every_row_sums_to_one_hundred_after_normalization() {
        let mut rows: Vec<LandUseRow> = (0..36).map(|i| row(6.0 + (i % 9) as f64)).collect();
        normalize_land_use(&mut rows).unwrap();
        for row in &rows {
            assert_relative_eq!(row.sum(), 100.0, epsilon = 1e-9);
        }
    }
}
