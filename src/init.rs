// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::assign_err;
use crate::common::Result;
use crate::store::{ArrayStore, Value};

/// One level of an implied repetition loop: `var = lo, hi [, step]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopSpec {
    pub lo: i64,
    pub hi: i64,
    pub step: i64,
}

impl LoopSpec {
    pub fn new(lo: i64, hi: i64) -> LoopSpec {
        LoopSpec { lo, hi, step: 1 }
    }

    pub fn with_step(lo: i64, hi: i64, step: i64) -> LoopSpec {
        LoopSpec { lo, hi, step }
    }

    fn trip_count(&self) -> Result<usize> {
        if self.step == 0 {
            return assign_err!(
                InvalidStride,
                "implied-loop step must be non-zero".to_string()
            );
        }
        let span = if self.step > 0 {
            self.hi - self.lo
        } else {
            self.lo - self.hi
        };
        if span < 0 {
            return Ok(0);
        }
        Ok((span / self.step.abs()) as usize + 1)
    }
}

/// A coordinate inside an implied-loop target: a literal subscript or a
/// reference to a loop variable by nesting position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoordExpr {
    Const(i64),
    Var(usize),
}

/// One target descriptor: either an explicit coordinate, or a nest of
/// repetition loops generating coordinates.
///
/// `Nest` loops are listed outermost first; the innermost (last) loop
/// varies fastest. Coordinate expressions may permute or repeat loop
/// variables, which is how reordered-index forms like
/// `((a(j, i), j = 1, 3), i = 1, 2)` are expressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    At(Vec<i64>),
    Nest {
        loops: Vec<LoopSpec>,
        coords: Vec<CoordExpr>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RepeatedValue {
    pub value: Value,
    pub repeat: u32,
}

impl RepeatedValue {
    pub fn once(value: Value) -> RepeatedValue {
        RepeatedValue { value, repeat: 1 }
    }

    pub fn times(value: Value, repeat: u32) -> RepeatedValue {
        RepeatedValue { value, repeat }
    }
}

/// An aggregate initializer: a target list and a repeat-counted value list
/// that must expand to the same total count.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateInitializer {
    pub targets: Vec<Target>,
    pub values: Vec<RepeatedValue>,
}

impl AggregateInitializer {
    pub fn new(targets: Vec<Target>, values: Vec<RepeatedValue>) -> AggregateInitializer {
        AggregateInitializer { targets, values }
    }

    /// Flatten values by repeat count in list order, expand targets in list
    /// order, and pair the two streams positionally.
    pub fn expand(&self) -> Result<Vec<(Vec<i64>, Value)>> {
        let mut coords: Vec<Vec<i64>> = Vec::new();
        for target in &self.targets {
            match target {
                Target::At(coord) => coords.push(coord.clone()),
                Target::Nest { loops, coords: exprs } => expand_nest(loops, exprs, &mut coords)?,
            }
        }

        let mut stream: Vec<Value> = Vec::new();
        for rv in &self.values {
            if rv.repeat == 0 {
                return assign_err!(CountMismatch, "repeat count must be >= 1".to_string());
            }
            for _ in 0..rv.repeat {
                stream.push(rv.value);
            }
        }

        if stream.len() != coords.len() {
            return assign_err!(
                CountMismatch,
                format!(
                    "{} expanded values for {} expanded targets",
                    stream.len(),
                    coords.len()
                )
            );
        }
        Ok(coords.into_iter().zip(stream).collect())
    }

    pub fn apply_to(&self, store: &mut ArrayStore) -> Result<()> {
        apply(store, &self.expand()?)
    }
}

fn expand_nest(
    loops: &[LoopSpec],
    exprs: &[CoordExpr],
    out: &mut Vec<Vec<i64>>,
) -> Result<()> {
    let trips: Vec<usize> = loops
        .iter()
        .map(|l| l.trip_count())
        .collect::<Result<_>>()?;
    let total: usize = trips.iter().product();
    for k in 0..total {
        // odometer decomposition, innermost (last) loop fastest
        let mut rem = k;
        let mut vars = vec![0i64; loops.len()];
        for j in (0..loops.len()).rev() {
            let idx = rem % trips[j];
            rem /= trips[j];
            vars[j] = loops[j].lo + (idx as i64) * loops[j].step;
        }
        let mut coord = Vec::with_capacity(exprs.len());
        for expr in exprs {
            coord.push(match expr {
                CoordExpr::Const(c) => *c,
                CoordExpr::Var(v) => match vars.get(*v) {
                    Some(value) => *value,
                    None => {
                        return assign_err!(
                            Generic,
                            format!("loop variable index {v} out of range")
                        );
                    }
                },
            });
        }
        out.push(coord);
    }
    Ok(())
}

/// Write each expanded pair's value at its target coordinate; later pairs
/// targeting the same coordinate overwrite earlier ones.
pub fn apply(store: &mut ArrayStore, pairs: &[(Vec<i64>, Value)]) -> Result<()> {
    for (coord, value) in pairs {
        store.write(coord, *value)?;
    }
    Ok(())
}
