// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::common::Result;
use crate::store_err;

/// One dimension's declared addressable range.
///
/// Bounds are inclusive on both ends and are not anchored at any universal
/// base: `BoundedAxis::new(-3, 3)` addresses seven elements starting at -3.
/// `upper == lower - 1` declares a legal empty axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundedAxis {
    pub lower: i64,
    pub upper: i64,
}

impl BoundedAxis {
    pub fn new(lower: i64, upper: i64) -> Result<Self> {
        if upper < lower - 1 {
            return store_err!(
                OutOfBounds,
                format!("axis bounds {lower}..{upper} describe less than an empty range")
            );
        }
        Ok(BoundedAxis { lower, upper })
    }

    /// Number of addressable elements along this axis.
    pub fn size(&self) -> usize {
        (self.upper - self.lower + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.upper < self.lower
    }

    pub fn contains(&self, index: i64) -> bool {
        self.lower <= index && index <= self.upper
    }
}
