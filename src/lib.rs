// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod common;

pub mod alias;
pub mod axis;
pub mod init;
pub mod mask;
pub mod ops;
pub mod selector;
pub mod store;

#[cfg(test)]
mod selector_proptest;
#[cfg(test)]
mod testutils;

pub use self::alias::{AliasRef, AliasTarget};
pub use self::axis::BoundedAxis;
pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::init::{AggregateInitializer, CoordExpr, LoopSpec, RepeatedValue, Target};
pub use self::mask::{Mask, MaskedBlock, MaskedStmt, masked_assign};
pub use self::ops::{BinaryOp, CmpOp, Operand, compare, elementwise};
pub use self::selector::{AxisSelect, Region, RegionSelector};
pub use self::store::{ArrayStore, ElementKind, StoreHandle, Value};
