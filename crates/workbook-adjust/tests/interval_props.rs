use pretty_assertions::assert_eq;
use proptest::prelude::*;
use workbook_adjust::editing::{adjust_interval, adjust_point};

/// `(start, end)` with `start <= end`, kept well inside `u32`.
fn interval() -> impl Strategy<Value = (u32, u32)> {
    (0u32..100_000, 0u32..1_000).prop_map(|(start, len)| (start, start + len))
}

#[test]
fn overlapping_deletes_map_each_endpoint() {
    // Deleting 3..=6 from 2..=4: the start survives, the end falls back to the pivot's neighbour.
    assert_eq!(adjust_interval(2, 4, 3, -4), Some((2, 2)));
    // Deleting 1..=3 from 2..=8: the start moves to the pivot, the end moves up.
    assert_eq!(adjust_interval(2, 8, 1, -3), Some((1, 5)));
    // Deleting 0..=9 from 2..=8 swallows it.
    assert_eq!(adjust_interval(2, 8, 0, -10), None);
    assert_eq!(adjust_interval(0, 0, 0, -1), None);
    assert_eq!(adjust_point(5, 5, -1), None);
    assert_eq!(adjust_point(6, 5, -1), Some(5));
}

proptest! {
    #![proptest_config(ProptestConfig {
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn insert_before_shifts((start, end) in interval(), back in 0u32..1_000, n in 1i64..500) {
        let pivot = start.saturating_sub(back);
        prop_assert_eq!(
            adjust_interval(start, end, pivot, n),
            Some((u64::from(start) + n as u64, u64::from(end) + n as u64))
        );
    }

    #[test]
    fn insert_inside_grows((start, end) in interval(), offset in 1u32..1_000, n in 1i64..500) {
        prop_assume!(end > start);
        let pivot = start + 1 + offset % (end - start);
        prop_assert_eq!(
            adjust_interval(start, end, pivot, n),
            Some((u64::from(start), u64::from(end) + n as u64))
        );
    }

    #[test]
    fn insert_after_is_ignored((start, end) in interval(), gap in 1u32..1_000, n in 1i64..500) {
        prop_assert_eq!(
            adjust_interval(start, end, end + gap, n),
            Some((u64::from(start), u64::from(end)))
        );
    }

    #[test]
    fn delete_before_shifts((start, end) in interval(), pivot in 0u32..100_000, n in 1u32..500) {
        prop_assume!(pivot + n - 1 < start);
        prop_assert_eq!(
            adjust_interval(start, end, pivot, -i64::from(n)),
            Some((u64::from(start - n), u64::from(end - n)))
        );
    }

    #[test]
    fn delete_keeps_exactly_the_surviving_lines(
        (start, end) in (0u32..200, 0u32..50).prop_map(|(s, l)| (s, s + l)),
        pivot in 0u32..260,
        n in 1u32..60,
    ) {
        let deleted = |line: u32| line >= pivot && line < pivot + n;
        let moved = |line: u32| if line >= pivot + n { u64::from(line - n) } else { u64::from(line) };
        let survivors: Vec<u32> = (start..=end).filter(|l| !deleted(*l)).collect();

        let expected = match (survivors.first(), survivors.last()) {
            (Some(first), Some(last)) => Some((moved(*first), moved(*last))),
            _ => None,
        };
        prop_assert_eq!(adjust_interval(start, end, pivot, -i64::from(n)), expected);
    }

    #[test]
    fn deleting_the_only_line_collapses(line in 0u32..1_000_000, back in 0u32..10, n in 1u32..10) {
        let pivot = line.saturating_sub(back);
        prop_assume!(pivot + n > line);
        prop_assert_eq!(adjust_point(line, pivot, -i64::from(n)), None);
    }

    #[test]
    fn zero_magnitude_is_identity((start, end) in interval(), pivot in 0u32..200_000) {
        prop_assert_eq!(
            adjust_interval(start, end, pivot, 0),
            Some((u64::from(start), u64::from(end)))
        );
    }

    #[test]
    fn insert_then_delete_restores((start, end) in interval(), pivot in 0u32..200_000, n in 1u32..500) {
        let (s, e) = adjust_interval(start, end, pivot, i64::from(n)).unwrap();
        let back = adjust_interval(s as u32, e as u32, pivot, -i64::from(n));
        prop_assert_eq!(back, Some((u64::from(start), u64::from(end))));
    }
}
