// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use smallvec::SmallVec;

use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::sel_err;
use crate::store::ArrayStore;

/// One axis of a selector.
///
/// `Index` is a single subscript and removes the axis from the resolved
/// region's shape, the way a scalar subscript reduces rank. `Range` is the
/// `start:stop:stride` triplet with Fortran-style defaulting: omitted bounds
/// fall back to the axis's own declared bounds, honoring stride direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisSelect {
    Index(i64),
    Range {
        start: Option<i64>,
        stop: Option<i64>,
        stride: i64,
    },
}

impl AxisSelect {
    /// The whole axis: `:`
    pub fn all() -> Self {
        AxisSelect::Range {
            start: None,
            stop: None,
            stride: 1,
        }
    }

    pub fn range(start: i64, stop: i64) -> Self {
        AxisSelect::Range {
            start: Some(start),
            stop: Some(stop),
            stride: 1,
        }
    }

    pub fn range_step(start: i64, stop: i64, stride: i64) -> Self {
        AxisSelect::Range {
            start: Some(start),
            stop: Some(stop),
            stride,
        }
    }
}

/// A per-axis selection over a store, resolved against the store's own
/// declared bounds rather than any global indexing convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionSelector {
    per_axis: Vec<AxisSelect>,
}

/// The offsets a selector resolved to, in pairing order (axis 0 fastest),
/// plus the per-axis lengths that survive rank reduction. The per-axis
/// lengths are what elementwise pairing checks for conformance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    offsets: Vec<usize>,
    axis_lens: SmallVec<[usize; 4]>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn axis_lens(&self) -> &[usize] {
        &self.axis_lens
    }

    /// Two regions may be paired elementwise only if their shapes agree.
    pub fn conforms(&self, other: &Region) -> bool {
        self.axis_lens == other.axis_lens
    }
}

impl RegionSelector {
    pub fn new(per_axis: Vec<AxisSelect>) -> Self {
        RegionSelector { per_axis }
    }

    /// Select every element of a rank-`rank` store.
    pub fn all(rank: usize) -> Self {
        RegionSelector {
            per_axis: vec![AxisSelect::all(); rank],
        }
    }

    pub fn per_axis(&self) -> &[AxisSelect] {
        &self.per_axis
    }

    /// Parse the textual mini-grammar: comma-separated axis selects, each
    /// `[start] ":" [stop] [":" stride] | index`. `::stride` omits both
    /// bounds; a bare `:` selects the whole axis.
    pub fn parse(text: &str) -> Result<RegionSelector> {
        let mut per_axis = Vec::new();
        for piece in text.split(',') {
            let piece = piece.trim();
            if piece.is_empty() {
                return sel_err!(
                    InvalidSelector,
                    format!("empty axis selector in '{text}'")
                );
            }
            per_axis.push(parse_axis_select(piece)?);
        }
        Ok(RegionSelector { per_axis })
    }

    /// Resolve against a store's axes into a concrete offset sequence.
    ///
    /// Per-axis index lists are combined as a Cartesian product in declared
    /// axis order with axis 0 varying fastest, matching the store's own
    /// flattening order; that order is what pairs elements in subsequent
    /// elementwise operations.
    pub fn resolve(&self, store: &ArrayStore) -> Result<Region> {
        if self.per_axis.len() != store.rank() {
            return sel_err!(
                Generic,
                format!(
                    "selector has {} axes but store has rank {}",
                    self.per_axis.len(),
                    store.rank()
                )
            );
        }

        let strides = store.strides();
        let mut per_axis_offsets: Vec<Vec<usize>> = Vec::with_capacity(self.per_axis.len());
        let mut axis_lens: SmallVec<[usize; 4]> = SmallVec::new();

        for (i, select) in self.per_axis.iter().enumerate() {
            let axis = store.axes()[i];
            match *select {
                AxisSelect::Index(index) => {
                    if !axis.contains(index) {
                        return sel_err!(
                            OutOfBounds,
                            format!(
                                "index {index} outside axis {i} bounds {}..{}",
                                axis.lower, axis.upper
                            )
                        );
                    }
                    per_axis_offsets.push(vec![((index - axis.lower) as usize) * strides[i]]);
                    // single subscript: no axis_lens entry, rank is reduced
                }
                AxisSelect::Range {
                    start,
                    stop,
                    stride,
                } => {
                    if stride == 0 {
                        return sel_err!(
                            InvalidStride,
                            format!("stride must be non-zero for axis {i}")
                        );
                    }
                    // a fully-defaulted selection of an empty axis is the
                    // empty sequence, not an error
                    if axis.is_empty() && start.is_none() && stop.is_none() {
                        per_axis_offsets.push(Vec::new());
                        axis_lens.push(0);
                        continue;
                    }
                    let start = start.unwrap_or(if stride > 0 { axis.lower } else { axis.upper });
                    let stop = stop.unwrap_or(if stride > 0 { axis.upper } else { axis.lower });
                    for bound in [start, stop] {
                        if !axis.contains(bound) {
                            return sel_err!(
                                OutOfBounds,
                                format!(
                                    "bound {bound} outside axis {i} bounds {}..{}",
                                    axis.lower, axis.upper
                                )
                            );
                        }
                    }
                    let mut list = Vec::new();
                    let mut index = start;
                    if stride > 0 {
                        while index <= stop {
                            list.push(((index - axis.lower) as usize) * strides[i]);
                            index += stride;
                        }
                    } else {
                        while index >= stop {
                            list.push(((index - axis.lower) as usize) * strides[i]);
                            index += stride;
                        }
                    }
                    axis_lens.push(list.len());
                    per_axis_offsets.push(list);
                }
            }
        }

        let total: usize = per_axis_offsets.iter().map(|l| l.len()).product();
        let mut offsets = Vec::with_capacity(total);
        for k in 0..total {
            let mut rem = k;
            let mut offset = 0usize;
            for list in &per_axis_offsets {
                offset += list[rem % list.len()];
                rem /= list.len();
            }
            offsets.push(offset);
        }

        Ok(Region { offsets, axis_lens })
    }
}

fn parse_int(text: &str) -> Result<i64> {
    text.trim().parse().map_err(|_| {
        Error::new(
            ErrorKind::Selection,
            ErrorCode::ExpectedInteger,
            Some(format!("expected integer, found '{text}'")),
        )
    })
}

fn parse_opt_int(text: &str) -> Result<Option<i64>> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_int(text).map(Some)
    }
}

fn parse_axis_select(piece: &str) -> Result<AxisSelect> {
    if !piece.contains(':') {
        return Ok(AxisSelect::Index(parse_int(piece)?));
    }
    let parts: Vec<&str> = piece.split(':').collect();
    if parts.len() > 3 {
        return sel_err!(
            InvalidSelector,
            format!("too many ':' in axis selector '{piece}'")
        );
    }
    let start = parse_opt_int(parts[0])?;
    let stop = parse_opt_int(parts[1])?;
    let stride = if parts.len() == 3 {
        if parts[2].trim().is_empty() {
            return sel_err!(
                InvalidSelector,
                format!("missing stride after second ':' in '{piece}'")
            );
        }
        parse_int(parts[2])?
    } else {
        1
    };
    Ok(AxisSelect::Range {
        start,
        stop,
        stride,
    })
}
