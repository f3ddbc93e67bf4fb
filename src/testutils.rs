// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Shared helpers for store-backed tests.

use crate::selector::RegionSelector;
use crate::store::{ArrayStore, ElementKind, StoreHandle, Value};

/// A real-kind store with explicit contents, given in flattening order.
pub(crate) fn real_store(bounds: &[(i64, i64)], values: &[f64]) -> ArrayStore {
    let mut store = ArrayStore::declare(bounds, ElementKind::Real).unwrap();
    assert_eq!(store.len(), values.len());
    for (k, v) in values.iter().enumerate() {
        store.set(k, Value::Real(*v)).unwrap();
    }
    store
}

pub(crate) fn shared_real(bounds: &[(i64, i64)], values: &[f64]) -> StoreHandle {
    real_store(bounds, values).into_shared()
}

pub(crate) fn sel(text: &str) -> RegionSelector {
    RegionSelector::parse(text).unwrap()
}

/// Every element of a real store, in flattening order.
pub(crate) fn reals(store: &ArrayStore) -> Vec<f64> {
    (0..store.len())
        .map(|k| store.at(k).unwrap().as_real().unwrap())
        .collect()
}
