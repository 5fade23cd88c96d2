// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Integration tests for the CommonJS environment, driven through the same
//! property operations a script would perform.

use spacey_commonjs::{Assignment, CommonJsError, Environment, Options};
use spacey_macros::{assert_err, assert_matches, assert_ok, assert_same_value, js_function, js_object};
use spacey_value::{Function, PropertyDescriptor, PropertyKey, Value};
use std::cell::Cell;
use std::rc::Rc;

fn named(name: &str) -> Value {
    let label = name.to_string();
    js_function!(name, |_this, _args| Ok(Value::from(label.clone())))
}

fn key(name: &str) -> PropertyKey {
    PropertyKey::from(name)
}

/// `module.exports` as seen from script
fn module_exports(env: &Environment) -> Value {
    assert_ok!(env.module().to_value().get(&key("exports")))
}

/// `module.exports = value`
fn set_module_exports(env: &Environment, value: Value) {
    assert_ok!(env.module().to_value().set(key("exports"), value));
}

/// `module.exports[name] = value`
fn set_export(env: &Environment, name: &str, value: Value) {
    assert!(assert_ok!(module_exports(env).set(key(name), value)));
}

fn exported(env: &Environment) -> Value {
    assert_ok!(env.module().to_value().get(&key("exported")))
}

/// The collected exports as `(name, value)` pairs, read through the snapshot
fn entries(env: &Environment) -> Vec<(String, Value)> {
    let snapshot = exported(env);
    snapshot
        .keys()
        .into_iter()
        .map(|name| {
            let value = assert_ok!(snapshot.get(&key(&name)));
            (name, value)
        })
        .collect()
}

fn assert_exports(env: &Environment, expected: &[(&str, Value)]) {
    let actual = entries(env);
    let names: Vec<&str> = actual.iter().map(|(name, _)| name.as_str()).collect();
    let expected_names: Vec<&str> = expected.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, expected_names);

    for ((name, value), (_, want)) in actual.iter().zip(expected) {
        assert!(
            value.same_value(want),
            "export {} is {:?}, expected {:?}",
            name,
            value,
            want
        );
    }

    // module.exports and exports are the same object
    let live = module_exports(env);
    assert!(env.exports().is(&live));
    assert_eq!(live.keys(), names);
}

#[test]
fn test_single_explicitly_named_export() {
    let env = Environment::new();
    let foo = named("foo");

    set_export(&env, "foo", foo.clone());
    assert_exports(&env, &[("foo", foo)]);
}

#[test]
fn test_single_implicitly_named_export() {
    let env = Environment::new();
    let foo = named("foo");

    set_module_exports(&env, foo.clone());
    assert_exports(&env, &[("foo", foo)]);
}

#[test]
fn test_single_anonymous_export() {
    let env = Environment::new();
    set_module_exports(&env, Value::from(42));
    assert_exports(&env, &[("default", Value::from(42))]);
}

#[test]
fn test_duplicate_named_exports() {
    let env = Environment::new();
    let (foo, bar, baz) = (named("foo"), named("bar"), named("baz"));

    set_export(&env, "foo", foo.clone());
    set_export(&env, "foo", foo.clone());
    set_module_exports(&env, bar.clone());
    set_module_exports(&env, bar.clone());
    set_export(&env, "baz", baz.clone());
    set_module_exports(&env, baz.clone());
    set_export(&env, "quux", Value::from(f64::NAN));
    set_export(&env, "quux", Value::from(f64::NAN));

    assert_exports(
        &env,
        &[
            ("foo", foo),
            ("bar", bar),
            ("baz", baz),
            ("quux", Value::from(f64::NAN)),
        ],
    );
}

#[test]
fn test_duplicate_anonymous_exports() {
    let env = Environment::new();

    for value in [
        Value::from(42),
        Value::from(42),
        Value::from("foo"),
        Value::from("foo"),
        Value::from(f64::NAN),
        Value::from(f64::NAN),
    ] {
        set_module_exports(&env, value);
    }

    assert_exports(
        &env,
        &[
            ("default", Value::from(42)),
            ("default_1", Value::from("foo")),
            ("default_2", Value::from(f64::NAN)),
        ],
    );
}

#[test]
fn test_same_name_different_values() {
    let env = Environment::new();
    let (foo, bar) = (named("foo"), named("bar"));

    set_export(&env, "foo", foo.clone());
    set_export(&env, "foo", bar.clone());

    assert_exports(&env, &[("foo", foo), ("foo_1", bar)]);
}

#[test]
fn test_multiple_anonymous_functions() {
    let env = Environment::new();
    let first = js_function!(|_this, _args| Ok(Value::Undefined));
    let second = js_function!(|_this, _args| Ok(Value::Undefined));

    set_module_exports(&env, first.clone());
    set_module_exports(&env, second.clone());

    assert_exports(&env, &[("default", first), ("default_1", second)]);
}

#[test]
fn test_multiple_named_functions() {
    let env = Environment::new();
    let (foo, bar) = (named("foo"), named("bar"));

    set_module_exports(&env, foo.clone());
    set_module_exports(&env, bar.clone());

    assert_exports(&env, &[("foo", foo), ("bar", bar)]);
}

#[test]
fn test_multiple_property_bags() {
    let env = Environment::new();
    let (foo, bar) = (named("foo"), named("bar"));
    let props1 = js_object! { "foo" => foo.clone(), "bar" => bar.clone() };
    let props2 = js_object! { "foo" => foo.clone(), "bar" => bar.clone() };

    set_module_exports(&env, props1.clone());
    set_module_exports(&env, props2.clone());

    assert_exports(
        &env,
        &[
            ("foo", foo),
            ("bar", bar),
            ("default", props1),
            ("default_1", props2),
        ],
    );
}

#[test]
fn test_assign_to_generated_names() {
    let env = Environment::new();
    let bar = named("bar");
    let bar_1 = named("bar_1");

    set_export(&env, "foo", Value::from(1));
    set_export(&env, "foo", Value::from(2));
    set_export(&env, "foo_1", Value::from(3));
    set_export(&env, "foo_1_1", Value::from(4));
    set_export(&env, "foo_1_1", Value::from(5));
    set_export(&env, "foo_1_1", Value::from(6));
    set_module_exports(&env, Value::from(7));
    set_module_exports(&env, Value::from(8));
    set_export(&env, "default_1", Value::from(9));
    set_export(&env, "default_1", Value::from(10));
    set_export(&env, "bar", Value::from(11));
    set_module_exports(&env, bar.clone());
    set_module_exports(&env, bar_1.clone());

    assert_exports(
        &env,
        &[
            ("foo", Value::from(1)),
            ("foo_1", Value::from(2)),
            ("foo_1_1", Value::from(3)),
            ("foo_1_1_1", Value::from(4)),
            ("foo_1_1_2", Value::from(5)),
            ("foo_1_1_3", Value::from(6)),
            ("default", Value::from(7)),
            ("default_1", Value::from(8)),
            ("default_1_1", Value::from(9)),
            ("default_1_2", Value::from(10)),
            ("bar", Value::from(11)),
            ("bar_1", bar),
            ("bar_1_1", bar_1),
        ],
    );
}

#[test]
fn test_pre_empt_generated_names() {
    let env = Environment::new();

    for (name, value) in [
        ("foo_1", 1),
        ("foo_2", 2),
        ("foo", 3),
        ("foo", 4),
        ("foo_1", 5),
        ("foo_2", 6),
        ("foo_1", 7),
        ("foo_2", 8),
        ("foo", 9),
        ("foo", 10),
    ] {
        set_export(&env, name, Value::from(value));
    }

    assert_exports(
        &env,
        &[
            ("foo_1", Value::from(1)),
            ("foo_2", Value::from(2)),
            ("foo", Value::from(3)),
            ("foo_3", Value::from(4)),
            ("foo_1_1", Value::from(5)),
            ("foo_2_1", Value::from(6)),
            ("foo_1_2", Value::from(7)),
            ("foo_2_2", Value::from(8)),
            ("foo_4", Value::from(9)),
            ("foo_5", Value::from(10)),
        ],
    );
}

#[test]
fn test_duplicate_assignments() {
    let env = Environment::new();

    for (name, value) in [
        ("foo", 1),
        ("foo", 2),
        ("foo", 3),
        ("foo", 1),
        ("foo", 2),
        ("foo", 3),
        ("foo_1", 2),
        ("foo_2", 3),
        ("foo_1", 2),
        ("foo_2", 3),
    ] {
        set_export(&env, name, Value::from(value));
    }

    assert_exports(
        &env,
        &[
            ("foo", Value::from(1)),
            ("foo_1", Value::from(2)),
            ("foo_2", Value::from(3)),
        ],
    );
}

#[test]
fn test_assignment_reports() {
    let env = Environment::new();
    let exports = env.exports();

    assert_eq!(exports.assign("foo", Value::from(1)), Assignment::Bound(key("foo")));
    assert_eq!(exports.assign("foo", Value::from(2)), Assignment::Bound(key("foo_1")));
    assert_eq!(exports.assign("foo", Value::from(2)), Assignment::Unchanged(key("foo_1")));
    assert!(!exports.assign("foo", Value::from(1)).is_bound());
}

#[test]
fn test_whole_module_object_expansion() {
    let env = Environment::new();
    let (foo, bar, baz) = (named("foo"), named("bar"), named("baz"));

    set_export(&env, "foo", foo.clone());
    set_export(&env, "bar", bar.clone());
    let bag = js_object! { "baz" => baz.clone() };
    set_module_exports(&env, bag.clone());

    let live = module_exports(&env);
    assert_eq!(live.keys(), vec!["foo", "bar", "baz", "default"]);
    assert_eq!(assert_ok!(live.get(&key("baz"))), baz);
    assert_eq!(assert_ok!(live.get(&key("default"))), bag);
    assert_exports(
        &env,
        &[("foo", foo), ("bar", bar), ("baz", baz), ("default", bag)],
    );
}

#[test]
fn test_module_exported_snapshots() {
    let env = Environment::new();
    let (foo, bar, baz) = (named("foo"), named("bar"), named("baz"));

    set_module_exports(&env, foo.clone());
    set_module_exports(&env, bar.clone());

    // a snapshot is never the live object
    let live = module_exports(&env);
    assert_ne!(exported(&env), live);

    // every read returns a new snapshot
    let first = exported(&env);
    let second = exported(&env);
    assert_ne!(first, second);
    assert_eq!(first.keys(), second.keys());

    // writes to a snapshot stay in that snapshot
    let snapshot = exported(&env);
    assert!(assert_ok!(snapshot.set(key("baz"), baz.clone())));
    assert_eq!(assert_ok!(snapshot.get(&key("baz"))), baz);
    assert!(assert_ok!(live.get(&key("baz"))).is_undefined());
    assert!(assert_ok!(exported(&env).get(&key("baz"))).is_undefined());

    assert_exports(&env, &[("foo", foo), ("bar", bar)]);
}

#[test]
fn test_exported_ignores_writes() {
    let env = Environment::new();
    let module = env.module().to_value();

    assert!(!assert_ok!(module.set(key("exported"), Value::from(1))));
    assert!(exported(&env).is_plain_object());
}

#[test]
fn test_require_is_not_implemented() {
    let env = Environment::new();
    let require = env.require();

    assert_eq!(require.name(), "require");
    let err = assert_err!(require.call(&Value::Undefined, &[Value::from("fs")]));
    assert!(err.to_string().contains("not implemented"));
    assert_eq!(
        assert_err!(env.resolve("fs")),
        CommonJsError::not_implemented("fs")
    );
}

#[test]
fn test_module_require_override() {
    let env = Environment::new();
    let require = Rc::clone(env.require());

    let resolver = js_function!(|_this, args| {
        Ok(js_object! { "overridden" => args[0].clone() })
    });
    assert_ok!(env.module().to_value().set(key("require"), resolver));

    for id in ["foo", "bar"] {
        let module = assert_ok!(require.call(&Value::Undefined, &[Value::from(id)]));
        assert_eq!(module.inspect(), format!("{{ overridden: '{}' }}", id));
    }
}

#[test]
fn test_module_require_reads_return_trampoline() {
    let env = Environment::new();
    let via_module = assert_ok!(env.module().to_value().get(&key("require")));

    assert_matches!(&via_module, Value::Function(func) if Rc::ptr_eq(func, env.require()));
}

#[test]
fn test_non_function_require_raises_type_error() {
    let env = Environment::new();
    assert_ok!(env.module().to_value().set(key("require"), Value::from(42)));

    let err = assert_err!(env.require().call(&Value::Undefined, &[Value::from("fs")]));
    assert_eq!(err, spacey_value::Error::type_error("require is not a function"));
}

#[test]
fn test_options_require() {
    let env = Environment::with_options(Options::new().require(|id| {
        Ok(js_object! { "initialized" => id })
    }));

    for id in ["baz", "quux"] {
        let module = assert_ok!(env.require().call(&Value::Undefined, &[Value::from(id)]));
        assert_eq!(module.inspect(), format!("{{ initialized: '{}' }}", id));
    }
}

#[test]
fn test_resolver_errors_propagate() {
    let env = Environment::with_options(
        Options::new().require(|id| Err(spacey_value::Error::error(format!("missing {}", id)).into())),
    );

    let err = assert_err!(env.require().call(&Value::Undefined, &[Value::from("x")]));
    assert_eq!(err, spacey_value::Error::error("missing x"));
}

#[test]
fn test_live_exports() {
    let env = Environment::new();
    let exports = env.exports().to_value();
    let counter = Rc::new(Cell::new(0));
    let seen = Rc::clone(&counter);
    let getter = Rc::new(Function::anonymous(0, move |_, _| {
        seen.set(seen.get() + 1);
        Ok(Value::from(seen.get()))
    }));

    env.exports()
        .define("foo", PropertyDescriptor::accessor(Some(getter), None));
    env.exports().define(
        "foo",
        PropertyDescriptor::data(Value::from(42))
            .with_enumerable(false)
            .with_configurable(false),
    );
    set_export(&env, "foo", Value::from("bar"));

    let first = exported(&env);
    assert_eq!(counter.get(), 1);

    assert_eq!(assert_ok!(exports.get(&key("foo"))), Value::from(2));
    assert_eq!(assert_ok!(first.get(&key("foo"))), Value::from(1));
    assert_eq!(assert_ok!(exports.get(&key("foo"))), Value::from(3));
    assert_eq!(assert_ok!(first.get(&key("foo"))), Value::from(1));

    assert_eq!(assert_ok!(exports.get(&key("foo_1"))), Value::from(42));
    assert_eq!(assert_ok!(first.get(&key("foo_1"))), Value::from(42));
    assert_eq!(assert_ok!(exports.get(&key("foo_2"))), Value::from("bar"));
    assert_eq!(assert_ok!(first.get(&key("foo_2"))), Value::from("bar"));

    let second = exported(&env);
    assert_eq!(assert_ok!(second.get(&key("foo"))), Value::from(4));
    assert_eq!(assert_ok!(exports.get(&key("foo"))), Value::from(5));

    // the hidden binding is enumerable in snapshots only
    assert_eq!(exports.keys(), vec!["foo", "foo_2"]);
    assert_eq!(second.keys(), vec!["foo", "foo_1", "foo_2"]);
}

#[test]
fn test_symbol_exports() {
    let env = Environment::new();
    let exports = module_exports(&env);
    let tag = spacey_value::Symbol::new(Some("tag".into()));

    assert_ok!(exports.set(PropertyKey::from(tag.clone()), Value::from(1)));
    assert_ok!(exports.set(PropertyKey::from(tag.clone()), Value::from(2)));
    set_export(&env, "tag", Value::from(3));

    assert_same_value!(assert_ok!(exports.get(&PropertyKey::from(tag.clone()))), Value::from(2));
    assert_eq!(env.exports().len(), 2);

    let snapshot = assert_ok!(env.module().exported());
    assert_eq!(snapshot.borrow().get(&PropertyKey::from(tag)), Some(Value::from(2)));
}

#[test]
fn test_empty_name_is_ordinary() {
    let env = Environment::new();

    set_export(&env, "", Value::from(1));
    set_export(&env, "", Value::from(2));

    assert_exports(&env, &[("", Value::from(1)), ("_1", Value::from(2))]);
}

#[test]
fn test_missing_names_read_undefined() {
    let env = Environment::new();
    assert!(assert_ok!(module_exports(&env).get(&key("nothing"))).is_undefined());
}
