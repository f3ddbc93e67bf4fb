// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property-based tests for selector resolution.

use proptest::prelude::*;

use crate::selector::{AxisSelect, RegionSelector};
use crate::store::{ArrayStore, ElementKind};

proptest! {
    #[test]
    fn defaulted_selector_enumerates_whole_axis(lo in -50i64..50, size in 0usize..40) {
        let hi = lo + size as i64 - 1;
        let store = ArrayStore::declare(&[(lo, hi)], ElementKind::Real).unwrap();
        let region = RegionSelector::all(1).resolve(&store).unwrap();
        let expected: Vec<usize> = (0..size).collect();
        prop_assert_eq!(region.offsets(), &expected[..]);
    }

    #[test]
    fn stride_k_selection_has_ceil_length(size in 1usize..60, stride in 1i64..7) {
        let store = ArrayStore::declare(&[(1, size as i64)], ElementKind::Real).unwrap();
        let selector = RegionSelector::new(vec![AxisSelect::Range {
            start: None,
            stop: None,
            stride,
        }]);
        let region = selector.resolve(&store).unwrap();
        prop_assert_eq!(region.len(), size.div_ceil(stride as usize));
    }

    #[test]
    fn resolved_offsets_are_in_bounds_and_strictly_increasing(
        lo in -20i64..20,
        size in 1usize..30,
        stride in 1i64..6,
    ) {
        let hi = lo + size as i64 - 1;
        let store = ArrayStore::declare(&[(lo, hi)], ElementKind::Real).unwrap();
        let selector = RegionSelector::new(vec![AxisSelect::Range {
            start: None,
            stop: None,
            stride,
        }]);
        let region = selector.resolve(&store).unwrap();
        prop_assert!(!region.is_empty());
        for pair in region.offsets().windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        prop_assert!(*region.offsets().last().unwrap() < store.len());
    }

    #[test]
    fn negative_stride_reverses_positive_stride(size in 1usize..30, stride in 1i64..6) {
        let store = ArrayStore::declare(&[(1, size as i64)], ElementKind::Real).unwrap();
        let forward = RegionSelector::new(vec![AxisSelect::Range {
            start: None,
            stop: None,
            stride,
        }])
        .resolve(&store)
        .unwrap();
        // running backwards from the last forward-selected element visits
        // the same offsets in reverse
        let last = 1 + ((size as i64 - 1) / stride) * stride;
        let backward = RegionSelector::new(vec![AxisSelect::Range {
            start: Some(last),
            stop: Some(1),
            stride: -stride,
        }])
        .resolve(&store)
        .unwrap();
        let mut reversed: Vec<usize> = backward.offsets().to_vec();
        reversed.reverse();
        prop_assert_eq!(region_vec(&forward), reversed);
    }

    #[test]
    fn cartesian_product_length(rows in 1usize..8, cols in 1usize..8) {
        let store =
            ArrayStore::declare(&[(1, rows as i64), (1, cols as i64)], ElementKind::Real).unwrap();
        let region = RegionSelector::all(2).resolve(&store).unwrap();
        prop_assert_eq!(region.len(), rows * cols);
        prop_assert_eq!(region.axis_lens(), &[rows, cols]);
    }
}

fn region_vec(region: &crate::selector::Region) -> Vec<usize> {
    region.offsets().to_vec()
}
