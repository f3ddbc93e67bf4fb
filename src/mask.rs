// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::assign_err;
use crate::common::Result;
use crate::ops::Operand;
use crate::selector::Region;
use crate::store::{ArrayStore, StoreHandle, Value};

/// A boolean-per-element snapshot over a region, in the region's pairing
/// order.
///
/// The bits are owned and copied out of the operand stores at evaluation
/// time, so a construct's statements can freely write to the arrays the
/// mask was computed from without perturbing which elements stay selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    axis_lens: SmallVec<[usize; 4]>,
    bits: Vec<bool>,
}

impl Mask {
    pub(crate) fn new(axis_lens: SmallVec<[usize; 4]>, bits: Vec<bool>) -> Mask {
        Mask { axis_lens, bits }
    }

    /// Evaluate a per-element predicate over a region of a store.
    pub fn from_predicate(
        store: &ArrayStore,
        region: &Region,
        pred: impl Fn(&Value) -> bool,
    ) -> Result<Mask> {
        let mut bits = Vec::with_capacity(region.len());
        for &offset in region.offsets() {
            bits.push(pred(&store.at(offset)?));
        }
        Ok(Mask {
            axis_lens: SmallVec::from_slice(region.axis_lens()),
            bits,
        })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn axis_lens(&self) -> &[usize] {
        &self.axis_lens
    }

    pub fn get(&self, k: usize) -> bool {
        self.bits[k]
    }

    pub fn count_true(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn conforms(&self, region: &Region) -> bool {
        self.axis_lens.as_slice() == region.axis_lens()
    }

    pub fn and(&self, other: &Mask) -> Result<Mask> {
        self.zip_with(other, |l, r| l && r)
    }

    pub fn or(&self, other: &Mask) -> Result<Mask> {
        self.zip_with(other, |l, r| l || r)
    }

    pub fn xor(&self, other: &Mask) -> Result<Mask> {
        self.zip_with(other, |l, r| l != r)
    }

    pub fn not(&self) -> Mask {
        Mask {
            axis_lens: self.axis_lens.clone(),
            bits: self.bits.iter().map(|b| !b).collect(),
        }
    }

    fn zip_with(&self, other: &Mask, f: impl Fn(bool, bool) -> bool) -> Result<Mask> {
        if self.axis_lens != other.axis_lens {
            return assign_err!(
                ShapeMismatch,
                format!(
                    "mask shapes {:?} and {:?} do not conform",
                    self.axis_lens, other.axis_lens
                )
            );
        }
        Ok(Mask {
            axis_lens: self.axis_lens.clone(),
            bits: self
                .bits
                .iter()
                .zip(other.bits.iter())
                .map(|(&l, &r)| f(l, r))
                .collect(),
        })
    }
}

/// One assignment inside a masked construct: a target region of a shared
/// store and the value source paired with it positionally.
#[derive(Clone, Debug)]
pub struct MaskedStmt {
    target: (StoreHandle, Region),
    source: Operand,
}

impl MaskedStmt {
    pub fn new(store: &StoreHandle, region: Region, source: Operand) -> MaskedStmt {
        MaskedStmt {
            target: (Rc::clone(store), region),
            source,
        }
    }
}

/// A masked bulk-assignment construct.
///
/// The mask is a snapshot taken before any statement runs and never changes
/// for the construct's duration. Each then-statement executes completely,
/// in order, across every true position before the next begins; otherwise-
/// statements then run across the false positions. Statement sources are
/// read at execution time, so a later statement observes an earlier
/// statement's writes (sequential semantics) while the mask does not.
#[derive(Clone, Debug)]
pub struct MaskedBlock {
    mask: Mask,
    then_stmts: Vec<MaskedStmt>,
    otherwise_stmts: Vec<MaskedStmt>,
}

impl MaskedBlock {
    pub fn new(mask: Mask) -> MaskedBlock {
        MaskedBlock {
            mask,
            then_stmts: Vec::new(),
            otherwise_stmts: Vec::new(),
        }
    }

    pub fn then(mut self, stmt: MaskedStmt) -> MaskedBlock {
        self.then_stmts.push(stmt);
        self
    }

    pub fn otherwise(mut self, stmt: MaskedStmt) -> MaskedBlock {
        self.otherwise_stmts.push(stmt);
        self
    }

    pub fn run(&self) -> Result<()> {
        // conformance is checked for every statement up front, before any
        // element is written
        for stmt in self.then_stmts.iter().chain(self.otherwise_stmts.iter()) {
            if !self.mask.conforms(&stmt.target.1) {
                return assign_err!(
                    ShapeMismatch,
                    format!(
                        "statement target shape {:?} does not match mask shape {:?}",
                        stmt.target.1.axis_lens(),
                        self.mask.axis_lens
                    )
                );
            }
            if let Operand::Region(_, source) = &stmt.source
                && source.axis_lens() != self.mask.axis_lens.as_slice()
            {
                return assign_err!(
                    ShapeMismatch,
                    format!(
                        "statement source shape {:?} does not match mask shape {:?}",
                        source.axis_lens(),
                        self.mask.axis_lens
                    )
                );
            }
        }
        for stmt in &self.then_stmts {
            self.apply_stmt(stmt, true)?;
        }
        for stmt in &self.otherwise_stmts {
            self.apply_stmt(stmt, false)?;
        }
        Ok(())
    }

    fn apply_stmt(&self, stmt: &MaskedStmt, sense: bool) -> Result<()> {
        let (store, region) = &stmt.target;
        for k in 0..self.mask.len() {
            if self.mask.get(k) != sense {
                continue;
            }
            let value = stmt.source.value_at(k)?;
            store.borrow_mut().set(region.offsets()[k], value)?;
        }
        Ok(())
    }
}

/// The single-statement inline form: one assignment under a mask, no
/// otherwise branch.
pub fn masked_assign(mask: Mask, stmt: MaskedStmt) -> Result<()> {
    MaskedBlock::new(mask).then(stmt).run()
}
