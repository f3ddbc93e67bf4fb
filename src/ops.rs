// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::rc::Rc;

use float_cmp::approx_eq;
use smallvec::SmallVec;

use crate::mask::Mask;
use crate::sel_err;
use crate::selector::Region;
use crate::store::{ArrayStore, ElementKind, StoreHandle, Value};
use crate::common::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// One side of an elementwise operation: either a scalar broadcast across
/// the other operand's shape, or a resolved region of a shared store.
#[derive(Clone, Debug)]
pub enum Operand {
    Scalar(Value),
    Region(StoreHandle, Region),
}

impl Operand {
    pub fn scalar(value: Value) -> Operand {
        Operand::Scalar(value)
    }

    pub fn region(store: &StoreHandle, region: Region) -> Operand {
        Operand::Region(Rc::clone(store), region)
    }

    pub(crate) fn axis_lens(&self) -> Option<&[usize]> {
        match self {
            Operand::Scalar(_) => None,
            Operand::Region(_, region) => Some(region.axis_lens()),
        }
    }

    /// The k-th element in pairing order; scalars repeat.
    pub(crate) fn value_at(&self, k: usize) -> Result<Value> {
        match self {
            Operand::Scalar(value) => Ok(*value),
            Operand::Region(store, region) => store.borrow().at(region.offsets()[k]),
        }
    }
}

/// The shape two operands pair over. Both-region operands must conform;
/// a scalar adopts the region's shape; two scalars have no shape to adopt.
pub(crate) fn common_shape(lhs: &Operand, rhs: &Operand) -> Result<SmallVec<[usize; 4]>> {
    match (lhs.axis_lens(), rhs.axis_lens()) {
        (Some(l), Some(r)) => {
            if l == r {
                Ok(SmallVec::from_slice(l))
            } else {
                sel_err!(
                    ShapeMismatch,
                    format!("elementwise operands have shapes {l:?} and {r:?}")
                )
            }
        }
        (Some(shape), None) | (None, Some(shape)) => Ok(SmallVec::from_slice(shape)),
        (None, None) => sel_err!(
            Generic,
            "elementwise operation requires at least one region operand".to_string()
        ),
    }
}

/// Elementwise real arithmetic over conforming operands, producing a fresh
/// store of the common shape with 1-based axes. Division and mod follow
/// IEEE semantics; no special-casing of zero divisors.
pub fn elementwise(op: BinaryOp, lhs: &Operand, rhs: &Operand) -> Result<ArrayStore> {
    let shape = common_shape(lhs, rhs)?;
    let bounds: Vec<(i64, i64)> = shape.iter().map(|&n| (1, n as i64)).collect();
    let mut out = ArrayStore::declare(&bounds, ElementKind::Real)?;
    let n: usize = shape.iter().product();
    for k in 0..n {
        let l = lhs.value_at(k)?.as_real()?;
        let r = rhs.value_at(k)?.as_real()?;
        let v = match op {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => l / r,
            BinaryOp::Mod => l.rem_euclid(r),
            BinaryOp::Exp => l.powf(r),
        };
        out.set(k, Value::Real(v))?;
    }
    Ok(out)
}

/// Elementwise relational comparison over conforming operands, producing a
/// mask in the operands' pairing order.
pub fn compare(op: CmpOp, lhs: &Operand, rhs: &Operand) -> Result<Mask> {
    let shape = common_shape(lhs, rhs)?;
    let n: usize = shape.iter().product();
    let mut bits = Vec::with_capacity(n);
    for k in 0..n {
        bits.push(compare_values(op, lhs.value_at(k)?, rhs.value_at(k)?)?);
    }
    Ok(Mask::new(shape, bits))
}

fn compare_values(op: CmpOp, l: Value, r: Value) -> Result<bool> {
    let res = match (l, r) {
        (Value::Real(l), Value::Real(r)) => match op {
            CmpOp::Eq => approx_eq!(f64, l, r),
            CmpOp::Neq => !approx_eq!(f64, l, r),
            CmpOp::Lt => l < r,
            CmpOp::Lte => l <= r,
            CmpOp::Gt => l > r,
            CmpOp::Gte => l >= r,
        },
        (Value::Character(l), Value::Character(r)) => match op {
            CmpOp::Eq => l == r,
            CmpOp::Neq => l != r,
            CmpOp::Lt => l < r,
            CmpOp::Lte => l <= r,
            CmpOp::Gt => l > r,
            CmpOp::Gte => l >= r,
        },
        (Value::Boolean(l), Value::Boolean(r)) => match op {
            CmpOp::Eq => l == r,
            CmpOp::Neq => l != r,
            _ => {
                return sel_err!(
                    KindMismatch,
                    "boolean values only support eq/neq comparison".to_string()
                );
            }
        },
        (l, r) => {
            return sel_err!(
                KindMismatch,
                format!("cannot compare {:?} with {:?}", l.kind(), r.kind())
            );
        }
    };
    Ok(res)
}
