// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Export name allocation.
//!
//! A requested name is translated into a name that is unique within the
//! collection by probing `name`, `name_1`, `name_2`, ... in order:
//!
//! ```text
//! exports.foo = 1      // foo
//! exports.foo = 2      // foo_1
//! exports.foo_1 = 3    // foo_1_1 (foo_1 is taken)
//! exports.foo = 1      // no-op: foo already holds 1
//! ```
//!
//! Generated names are not reserved: writing `foo_1` directly occupies the
//! slot like any other name, and later probes for `foo` skip over it.

use crate::collection::ExportCollection;
use spacey_value::{Function, PropertyDescriptor, PropertyKey, Value};
use std::rc::Rc;

/// Outcome of a name allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// The binding should be stored under this (previously unused) name
    Fresh(String),
    /// An identical binding already exists under this name; nothing to write
    Existing(String),
}

/// Translates requested export names into unique names.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameAllocator;

impl NameAllocator {
    /// Create a name allocator
    pub fn new() -> Self {
        Self
    }

    /// Decide where `descriptor` should be stored when written as `name`.
    pub fn resolve(
        &self,
        collection: &ExportCollection,
        name: &str,
        descriptor: &PropertyDescriptor,
    ) -> Allocation {
        let mut suffix = 0;

        loop {
            let candidate = candidate_name(name, suffix);

            match collection.get(&PropertyKey::from(candidate.as_str())) {
                Some(existing) if same_binding(existing, descriptor) => {
                    return Allocation::Existing(candidate);
                }
                Some(_) => suffix += 1,
                None => return Allocation::Fresh(candidate),
            }
        }
    }
}

/// The `suffix`-th probe for `name`: `name`, `name_1`, `name_2`, ...
pub fn candidate_name(name: &str, suffix: usize) -> String {
    if suffix == 0 {
        name.to_string()
    } else {
        format!("{}_{}", name, suffix)
    }
}

/// Whether two bindings are the same export: same getter, same setter and
/// SameValue-equal values (accessors carry `undefined`).
pub fn same_binding(a: &PropertyDescriptor, b: &PropertyDescriptor) -> bool {
    same_function(a.getter(), b.getter())
        && same_function(a.setter(), b.setter())
        && a.value().same_value(&b.value())
}

fn same_function(a: Option<&Rc<Function>>, b: Option<&Rc<Function>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// The name a whole-module export is requested under: a named function's
/// own name, otherwise `default`.
pub fn default_export_name(value: &Value) -> String {
    match value {
        Value::Function(func) if !func.name().is_empty() => func.name().to_string(),
        _ => "default".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(value: impl Into<Value>) -> PropertyDescriptor {
        PropertyDescriptor::data(value.into())
    }

    fn collection(entries: &[(&str, PropertyDescriptor)]) -> ExportCollection {
        let mut collection = ExportCollection::new();
        for (name, descriptor) in entries {
            collection.insert((*name).into(), descriptor.clone());
        }
        collection
    }

    #[test]
    fn test_candidate_names() {
        assert_eq!(candidate_name("foo", 0), "foo");
        assert_eq!(candidate_name("foo", 1), "foo_1");
        assert_eq!(candidate_name("foo_1", 2), "foo_1_2");
        assert_eq!(candidate_name("", 1), "_1");
    }

    #[test]
    fn test_unused_name_is_fresh() {
        let allocator = NameAllocator::new();
        let collection = ExportCollection::new();
        assert_eq!(
            allocator.resolve(&collection, "foo", &data(1)),
            Allocation::Fresh("foo".into())
        );
    }

    #[test]
    fn test_identical_value_is_existing() {
        let allocator = NameAllocator::new();
        let collection = collection(&[("foo", data(1)), ("foo_1", data(2))]);

        assert_eq!(
            allocator.resolve(&collection, "foo", &data(1)),
            Allocation::Existing("foo".into())
        );
        assert_eq!(
            allocator.resolve(&collection, "foo", &data(2)),
            Allocation::Existing("foo_1".into())
        );
        assert_eq!(
            allocator.resolve(&collection, "foo", &data(3)),
            Allocation::Fresh("foo_2".into())
        );
    }

    #[test]
    fn test_nan_matches_nan() {
        let allocator = NameAllocator::new();
        let collection = collection(&[("quux", data(f64::NAN))]);
        assert_eq!(
            allocator.resolve(&collection, "quux", &data(f64::NAN)),
            Allocation::Existing("quux".into())
        );
    }

    #[test]
    fn test_signed_zeros_differ() {
        let allocator = NameAllocator::new();
        let collection = collection(&[("zero", data(0.0))]);
        assert_eq!(
            allocator.resolve(&collection, "zero", &data(-0.0)),
            Allocation::Fresh("zero_1".into())
        );
    }

    #[test]
    fn test_accessors_compare_by_getter_identity() {
        let getter = Rc::new(Function::native("get", 0, |_, _| Ok(Value::from(1))));
        let other = Rc::new(Function::native("get", 0, |_, _| Ok(Value::from(1))));
        let allocator = NameAllocator::new();
        let collection = collection(&[(
            "live",
            PropertyDescriptor::accessor(Some(Rc::clone(&getter)), None),
        )]);

        assert_eq!(
            allocator.resolve(&collection, "live", &PropertyDescriptor::accessor(Some(getter), None)),
            Allocation::Existing("live".into())
        );
        assert_eq!(
            allocator.resolve(&collection, "live", &PropertyDescriptor::accessor(Some(other), None)),
            Allocation::Fresh("live_1".into())
        );
        // a data binding holding undefined is not the accessor
        assert_eq!(
            allocator.resolve(&collection, "live", &data(Value::Undefined)),
            Allocation::Fresh("live_1".into())
        );
    }

    #[test]
    fn test_occupied_generated_names_shift_probing() {
        let allocator = NameAllocator::new();
        let collection = collection(&[("foo_1", data(1)), ("foo_2", data(2)), ("foo", data(3))]);
        assert_eq!(
            allocator.resolve(&collection, "foo", &data(4)),
            Allocation::Fresh("foo_3".into())
        );
    }

    #[test]
    fn test_default_export_name() {
        let named = Value::from(Function::native("bar", 0, |_, _| Ok(Value::Undefined)));
        let anonymous = Value::from(Function::anonymous(0, |_, _| Ok(Value::Undefined)));

        assert_eq!(default_export_name(&named), "bar");
        assert_eq!(default_export_name(&anonymous), "default");
        assert_eq!(default_export_name(&Value::from(42)), "default");
        assert_eq!(default_export_name(&Value::from("bar")), "default");
    }
}
