//! Piecewise-linear lookup evaluation with out-of-range clamping.

use sdx_args::LookupTable;
use sdx_core::{Real, NOT_AVAILABLE};

/// Evaluate `table` at `x`: clamp to the first output below the first
/// sample and to the last output at or beyond the last sample,
/// otherwise interpolate linearly on the bracketing interval (located
/// by linear scan, cached on the table).
///
/// An empty table means the host's sample storage is not visible yet;
/// the "not available" sentinel is returned instead.
pub fn lookup_evaluate(table: &mut LookupTable, x: Real) -> Real {
    let count = table.sample_count();
    if count == 0 {
        return NOT_AVAILABLE;
    }
    let xs = table.xs();
    let ys = table.ys();

    if x <= xs[0] {
        return ys[0];
    }

    let mut i = 0;
    while i < count - 1 {
        if x <= xs[i + 1] {
            break;
        }
        i += 1;
    }
    if i == count - 1 {
        return ys[count - 1];
    }

    let value = ys[i] + (ys[i + 1] - ys[i]) * (x - xs[i]) / (xs[i + 1] - xs[i]);
    table.set_cached_index(i);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> LookupTable {
        LookupTable::new(vec![0.0, 1.0, 3.0], vec![10.0, 20.0, 40.0]).unwrap()
    }

    #[test]
    fn exact_sample_points_return_sample_values() {
        let mut t = table();
        assert_eq!(lookup_evaluate(&mut t, 0.0), 10.0);
        assert_eq!(lookup_evaluate(&mut t, 1.0), 20.0);
        assert_eq!(lookup_evaluate(&mut t, 3.0), 40.0);
    }

    #[test]
    fn clamps_outside_the_sample_range() {
        let mut t = table();
        assert_eq!(lookup_evaluate(&mut t, -5.0), 10.0);
        assert_eq!(lookup_evaluate(&mut t, 100.0), 40.0);
    }

    #[test]
    fn interpolates_between_samples() {
        let mut t = table();
        assert_eq!(lookup_evaluate(&mut t, 0.5), 15.0);
        assert_eq!(lookup_evaluate(&mut t, 2.0), 30.0);
        assert_eq!(t.cached_index(), 1);
    }

    #[test]
    fn alternate_kind_count_is_taken_absolute() {
        let mut t = table().into_alternate_kind();
        assert_eq!(lookup_evaluate(&mut t, 2.0), 30.0);
    }

    #[test]
    fn empty_table_returns_not_available() {
        let mut t = LookupTable::new(vec![], vec![]).unwrap();
        assert_eq!(lookup_evaluate(&mut t, 1.0), NOT_AVAILABLE);
    }

    #[test]
    fn single_sample_table_is_constant() {
        let mut t = LookupTable::new(vec![2.0], vec![9.0]).unwrap();
        assert_eq!(lookup_evaluate(&mut t, -1.0), 9.0);
        assert_eq!(lookup_evaluate(&mut t, 2.0), 9.0);
        assert_eq!(lookup_evaluate(&mut t, 5.0), 9.0);
    }

    proptest! {
        #[test]
        fn result_stays_inside_the_output_hull(x in -10.0f64..10.0) {
            let mut t = table();
            let y = lookup_evaluate(&mut t, x);
            prop_assert!((10.0..=40.0).contains(&y));
        }
    }
}
