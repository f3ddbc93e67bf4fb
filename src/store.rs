// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::cell::RefCell;
use std::rc::Rc;

use float_cmp::approx_eq;
use smallvec::SmallVec;

use crate::axis::BoundedAxis;
use crate::common::Result;
use crate::selector::Region;
use crate::store_err;

/// The element kind a store is declared with; fixed for the store's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Real,
    Boolean,
    Character,
}

impl ElementKind {
    /// The value a freshly declared store is filled with.
    pub fn zero(&self) -> Value {
        match self {
            ElementKind::Real => Value::Real(0.0),
            ElementKind::Boolean => Value::Boolean(false),
            ElementKind::Character => Value::Character(' '),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    Real(f64),
    Boolean(bool),
    Character(char),
}

impl Value {
    pub fn kind(&self) -> ElementKind {
        match self {
            Value::Real(_) => ElementKind::Real,
            Value::Boolean(_) => ElementKind::Boolean,
            Value::Character(_) => ElementKind::Character,
        }
    }

    pub fn as_real(&self) -> Result<f64> {
        match self {
            Value::Real(n) => Ok(*n),
            _ => store_err!(
                KindMismatch,
                format!("expected real value, found {:?}", self.kind())
            ),
        }
    }

    /// Equality with the same float tolerance the relational kernels use.
    pub fn approx_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Real(l), Value::Real(r)) => approx_eq!(f64, *l, *r),
            (l, r) => l == r,
        }
    }
}

pub(crate) type AxisVec = SmallVec<[BoundedAxis; 4]>;

/// Shared handle to a store, for masked-assignment constructs spanning
/// multiple arrays and for `AliasRef`'s weak references. `Rc`, not `Arc`:
/// the engine is reentrant but callers serialize same-store access.
pub type StoreHandle = Rc<RefCell<ArrayStore>>;

/// A flat element buffer addressed through declared per-axis bounds.
///
/// Flattening is column-major: axis 0 varies fastest, which is also the
/// order `RegionSelector` resolution pairs elements in. There is no resize
/// API; a different shape means declaring a new store.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayStore {
    axes: AxisVec,
    kind: ElementKind,
    data: Vec<Value>,
}

impl ArrayStore {
    /// Allocate a zero-filled store sized by the declared bounds.
    pub fn declare(bounds: &[(i64, i64)], kind: ElementKind) -> Result<ArrayStore> {
        let mut axes: AxisVec = SmallVec::new();
        for &(lower, upper) in bounds {
            axes.push(BoundedAxis::new(lower, upper)?);
        }
        let len: usize = axes.iter().map(|a| a.size()).product();
        Ok(ArrayStore {
            axes,
            kind,
            data: vec![kind.zero(); len],
        })
    }

    pub fn rank(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self) -> &[BoundedAxis] {
        &self.axes
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Column-major strides, in elements.
    pub(crate) fn strides(&self) -> SmallVec<[usize; 4]> {
        let mut strides = SmallVec::with_capacity(self.axes.len());
        let mut acc = 1usize;
        for axis in &self.axes {
            strides.push(acc);
            acc *= axis.size();
        }
        strides
    }

    /// Linear offset of a coordinate given in the store's own declared bounds.
    pub fn offset_of(&self, indices: &[i64]) -> Result<usize> {
        if indices.len() != self.axes.len() {
            return store_err!(
                Generic,
                format!(
                    "{} coordinates supplied for a rank-{} store",
                    indices.len(),
                    self.axes.len()
                )
            );
        }
        let mut offset = 0usize;
        let mut stride = 1usize;
        for (i, (&index, axis)) in indices.iter().zip(self.axes.iter()).enumerate() {
            if !axis.contains(index) {
                return store_err!(
                    OutOfBounds,
                    format!(
                        "coordinate {index} outside axis {i} bounds {}..{}",
                        axis.lower, axis.upper
                    )
                );
            }
            offset += ((index - axis.lower) as usize) * stride;
            stride *= axis.size();
        }
        Ok(offset)
    }

    pub fn read(&self, indices: &[i64]) -> Result<Value> {
        let offset = self.offset_of(indices)?;
        Ok(self.data[offset])
    }

    pub fn write(&mut self, indices: &[i64], value: Value) -> Result<()> {
        let offset = self.offset_of(indices)?;
        self.set(offset, value)
    }

    pub(crate) fn at(&self, offset: usize) -> Result<Value> {
        match self.data.get(offset) {
            Some(value) => Ok(*value),
            None => store_err!(
                OutOfBounds,
                format!("offset {offset} outside store of length {}", self.data.len())
            ),
        }
    }

    pub(crate) fn set(&mut self, offset: usize, value: Value) -> Result<()> {
        if value.kind() != self.kind {
            return store_err!(
                KindMismatch,
                format!("cannot write {:?} into {:?} store", value.kind(), self.kind)
            );
        }
        if offset >= self.data.len() {
            return store_err!(
                OutOfBounds,
                format!("offset {offset} outside store of length {}", self.data.len())
            );
        }
        self.data[offset] = value;
        Ok(())
    }

    /// Read every element of a region, in the region's offset order.
    pub fn gather(&self, region: &Region) -> Result<Vec<Value>> {
        let mut out = Vec::with_capacity(region.len());
        for &offset in region.offsets() {
            out.push(self.at(offset)?);
        }
        Ok(out)
    }

    /// Write a value per region offset, pairing positionally. Writes applied
    /// before a failing element stay applied.
    pub fn scatter(&mut self, region: &Region, values: &[Value]) -> Result<()> {
        if values.len() != region.len() {
            return store_err!(
                ShapeMismatch,
                format!(
                    "{} values scattered over a {}-element region",
                    values.len(),
                    region.len()
                )
            );
        }
        for (&offset, &value) in region.offsets().iter().zip(values.iter()) {
            self.set(offset, value)?;
        }
        Ok(())
    }

    pub fn into_shared(self) -> StoreHandle {
        Rc::new(RefCell::new(self))
    }
}
