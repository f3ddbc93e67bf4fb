// Copyright 2026 The Lattice Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::alias_err;
use crate::common::Result;
use crate::selector::{Region, RegionSelector};
use crate::store::{ArrayStore, StoreHandle, Value};

/// What an alias currently denotes: a single element's resolved offset, or
/// a resolved sub-region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AliasTarget {
    Element(usize),
    Section(Region),
}

/// A non-owning, rebindable reference into a shared store.
///
/// The store is held weakly: dropping the last `StoreHandle` detaches every
/// outstanding alias without the store having to track them, and detachment
/// is detected lazily on dereference. `nullify` detaches explicitly without
/// touching the former target's contents.
#[derive(Clone, Debug)]
pub struct AliasRef {
    store: Weak<RefCell<ArrayStore>>,
    target: Option<AliasTarget>,
}

impl AliasRef {
    /// Bind to the region a selector resolves to right now. A selection
    /// that reduces to a single rank-0 element binds an element alias;
    /// anything else binds a section alias.
    pub fn bind(handle: &StoreHandle, selector: &RegionSelector) -> Result<AliasRef> {
        let region = selector.resolve(&handle.borrow())?;
        let target = if region.axis_lens().is_empty() && region.len() == 1 {
            AliasTarget::Element(region.offsets()[0])
        } else {
            AliasTarget::Section(region)
        };
        Ok(AliasRef {
            store: Rc::downgrade(handle),
            target: Some(target),
        })
    }

    /// Bind directly to a pre-resolved linear offset.
    pub fn bind_offset(handle: &StoreHandle, offset: usize) -> Result<AliasRef> {
        if offset >= handle.borrow().len() {
            return alias_err!(
                OutOfBounds,
                format!(
                    "offset {offset} outside store of length {}",
                    handle.borrow().len()
                )
            );
        }
        Ok(AliasRef {
            store: Rc::downgrade(handle),
            target: Some(AliasTarget::Element(offset)),
        })
    }

    /// Repoint at a new target; the previous target's contents are
    /// unaffected.
    pub fn rebind(&mut self, handle: &StoreHandle, selector: &RegionSelector) -> Result<()> {
        *self = AliasRef::bind(handle, selector)?;
        Ok(())
    }

    /// Detach without mutating the former target.
    pub fn nullify(&mut self) {
        self.store = Weak::new();
        self.target = None;
    }

    pub fn is_detached(&self) -> bool {
        self.target.is_none() || self.store.upgrade().is_none()
    }

    fn deref_parts(&self) -> Result<(Rc<RefCell<ArrayStore>>, &AliasTarget)> {
        let target = match &self.target {
            Some(target) => target,
            None => return alias_err!(DetachedAlias, "alias has been nullified".to_string()),
        };
        match self.store.upgrade() {
            Some(store) => Ok((store, target)),
            None => alias_err!(DetachedAlias, "backing store has been dropped".to_string()),
        }
    }

    pub fn read(&self) -> Result<Value> {
        let (store, target) = self.deref_parts()?;
        match target {
            AliasTarget::Element(offset) => {
                let store = store.borrow();
                store.at(*offset)
            }
            AliasTarget::Section(_) => alias_err!(
                Generic,
                "section alias is read with gather(), not read()".to_string()
            ),
        }
    }

    pub fn write(&self, value: Value) -> Result<()> {
        let (store, target) = self.deref_parts()?;
        match target {
            AliasTarget::Element(offset) => store.borrow_mut().set(*offset, value),
            AliasTarget::Section(_) => alias_err!(
                Generic,
                "section alias is written with fill(), not write()".to_string()
            ),
        }
    }

    /// Read every element of a section alias, in region order.
    pub fn gather(&self) -> Result<Vec<Value>> {
        let (store, target) = self.deref_parts()?;
        match target {
            AliasTarget::Section(region) => store.borrow().gather(region),
            AliasTarget::Element(_) => alias_err!(
                Generic,
                "element alias is read with read(), not gather()".to_string()
            ),
        }
    }

    /// Write one value across every element of a section alias.
    pub fn fill(&self, value: Value) -> Result<()> {
        let (store, target) = self.deref_parts()?;
        match target {
            AliasTarget::Section(region) => {
                let mut store = store.borrow_mut();
                for &offset in region.offsets() {
                    store.set(offset, value)?;
                }
                Ok(())
            }
            AliasTarget::Element(_) => alias_err!(
                Generic,
                "element alias is written with write(), not fill()".to_string()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use crate::testutils::{reals, sel, shared_real};

    #[test]
    fn test_element_alias_round_trip() {
        let store = shared_real(&[(1, 3)], &[1.0, 2.0, 3.0]);
        let alias = AliasRef::bind(&store, &sel("2")).unwrap();
        assert_eq!(alias.read().unwrap(), Value::Real(2.0));

        alias.write(Value::Real(99.0)).unwrap();
        // the write is observable through the store directly
        assert_eq!(store.borrow().read(&[2]).unwrap(), Value::Real(99.0));

        // and store writes are observable through the alias
        store.borrow_mut().write(&[2], Value::Real(-1.0)).unwrap();
        assert_eq!(alias.read().unwrap(), Value::Real(-1.0));
    }

    #[test]
    fn test_nullify_detaches_without_mutating() {
        let store = shared_real(&[(1, 3)], &[1.0, 2.0, 3.0]);
        let mut alias = AliasRef::bind(&store, &sel("2")).unwrap();
        alias.write(Value::Real(99.0)).unwrap();

        alias.nullify();
        assert!(alias.is_detached());
        let err = alias.read().unwrap_err();
        assert_eq!(err.code, ErrorCode::DetachedAlias);
        let err = alias.write(Value::Real(0.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DetachedAlias);

        // the former target still holds the aliased write
        assert_eq!(store.borrow().read(&[2]).unwrap(), Value::Real(99.0));
    }

    #[test]
    fn test_store_drop_detaches_alias() {
        let store = shared_real(&[(1, 3)], &[1.0, 2.0, 3.0]);
        let alias = AliasRef::bind(&store, &sel("1")).unwrap();
        assert!(!alias.is_detached());

        drop(store);
        assert!(alias.is_detached());
        let err = alias.read().unwrap_err();
        assert_eq!(err.code, ErrorCode::DetachedAlias);
    }

    #[test]
    fn test_rebind() {
        let a = shared_real(&[(1, 3)], &[1.0, 2.0, 3.0]);
        let b = shared_real(&[(1, 3)], &[10.0, 20.0, 30.0]);
        let mut alias = AliasRef::bind(&a, &sel("1")).unwrap();
        assert_eq!(alias.read().unwrap(), Value::Real(1.0));

        alias.rebind(&b, &sel("3")).unwrap();
        assert_eq!(alias.read().unwrap(), Value::Real(30.0));
        // rebinding never mutated the old target
        assert_eq!(reals(&a.borrow()), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_section_alias() {
        let store = shared_real(&[(1, 5)], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let alias = AliasRef::bind(&store, &sel("2:4")).unwrap();
        assert_eq!(
            alias.gather().unwrap(),
            vec![Value::Real(2.0), Value::Real(3.0), Value::Real(4.0)]
        );

        alias.fill(Value::Real(0.0)).unwrap();
        assert_eq!(reals(&store.borrow()), vec![1.0, 0.0, 0.0, 0.0, 5.0]);

        // an element accessor on a section alias is a usage error
        let err = alias.read().unwrap_err();
        assert_eq!(err.code, ErrorCode::Generic);
        let err = alias.write(Value::Real(1.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Generic);
    }

    #[test]
    fn test_section_accessors_rejected_on_element_alias() {
        let store = shared_real(&[(1, 3)], &[1.0, 2.0, 3.0]);
        let alias = AliasRef::bind(&store, &sel("2")).unwrap();

        let err = alias.gather().unwrap_err();
        assert_eq!(err.code, ErrorCode::Generic);
        let err = alias.fill(Value::Real(0.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Generic);

        // the mismatched calls never touched the target
        assert_eq!(reals(&store.borrow()), vec![1.0, 2.0, 3.0]);
        assert_eq!(alias.read().unwrap(), Value::Real(2.0));
    }

    #[test]
    fn test_bind_offset() {
        let store = shared_real(&[(0, 2)], &[5.0, 6.0, 7.0]);
        let alias = AliasRef::bind_offset(&store, 2).unwrap();
        assert_eq!(alias.read().unwrap(), Value::Real(7.0));

        let err = AliasRef::bind_offset(&store, 3).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfBounds);
    }

    #[test]
    fn test_bind_out_of_bounds_selector() {
        let store = shared_real(&[(1, 3)], &[1.0, 2.0, 3.0]);
        let err = AliasRef::bind(&store, &sel("4")).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfBounds);
    }
}
