// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assertion macros for engine and shim tests.
//!
//! Each macro reports the stringified expression on failure, and the
//! `Result` forms hand back the unwrapped value or error so a test can keep
//! asserting on it.

/// Assert that an expression matches a pattern, with an optional guard.
///
/// # Example
///
/// ```
/// use spacey_macros::assert_matches;
/// use spacey_value::{Error, Value};
///
/// let err = Error::type_error("require is not a function");
/// assert_matches!(err, Error::TypeError(_));
/// assert_matches!(Value::from(2), Value::Number(n) if n > 1.0);
/// ```
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat) => {
        match $expr {
            $pat => {}
            ref e => panic!(
                "assertion failed: `{}` does not match pattern `{}`\n  value: {:?}",
                stringify!($expr),
                stringify!($pat),
                e
            ),
        }
    };
    ($expr:expr, $pat:pat if $guard:expr) => {
        match $expr {
            $pat if $guard => {}
            ref e => panic!(
                "assertion failed: `{}` does not match pattern `{} if {}`\n  value: {:?}",
                stringify!($expr),
                stringify!($pat),
                stringify!($guard),
                e
            ),
        }
    };
}

/// Unwrap an `Ok`, panicking with the expression and the error otherwise.
///
/// # Example
///
/// ```
/// use spacey_macros::assert_ok;
/// use spacey_value::{Object, Value};
///
/// let value = Value::object(Object::new());
/// assert_eq!(assert_ok!(value.get(&"missing".into())), Value::Undefined);
/// ```
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!(
                "assertion failed: expected Ok, got Err\n  expression: `{}`\n  error: {:?}",
                stringify!($expr),
                e
            ),
        }
    };
}

/// Unwrap an `Err`, panicking with the expression and the value otherwise.
///
/// # Example
///
/// ```
/// use spacey_macros::assert_err;
/// use spacey_value::{Error, Value};
///
/// let err = assert_err!(Value::Undefined.get(&"x".into()));
/// assert_eq!(err, Error::type_error("Cannot read properties of undefined (reading 'x')"));
/// ```
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!(
                "assertion failed: expected Err, got Ok\n  expression: `{}`\n  value: {:?}",
                stringify!($expr),
                v
            ),
            Err(e) => e,
        }
    };
}

/// Assert that two values are the same per `Object.is`.
///
/// Unlike `assert_eq!`, `NaN` matches `NaN` and `0` does not match `-0`.
///
/// # Example
///
/// ```
/// use spacey_macros::assert_same_value;
/// use spacey_value::Value;
///
/// assert_same_value!(Value::from(f64::NAN), Value::from(f64::NAN));
/// assert_same_value!(Value::from("foo"), Value::from("foo"));
/// ```
#[macro_export]
macro_rules! assert_same_value {
    ($left:expr, $right:expr $(,)?) => {{
        let left: ::spacey_value::Value = $left;
        let right: ::spacey_value::Value = $right;
        if !left.same_value(&right) {
            panic!(
                "assertion failed: `Object.is(left, right)`\n  left: {:?}\n  right: {:?}",
                left, right
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    use spacey_value::Value;

    #[test]
    fn test_assert_matches() {
        let value = Some(3);
        assert_matches!(value, Some(_));
        assert_matches!(value, Some(n) if n == 3);
    }

    #[test]
    #[should_panic(expected = "does not match pattern")]
    fn test_assert_matches_failure() {
        let value: Option<i32> = None;
        assert_matches!(value, Some(_));
    }

    #[test]
    fn test_assert_ok_and_err() {
        let ok: Result<i32, String> = Ok(1);
        let err: Result<i32, String> = Err("bad".into());

        assert_eq!(assert_ok!(ok), 1);
        assert_eq!(assert_err!(err), "bad");
    }

    #[test]
    #[should_panic(expected = "expected Ok")]
    fn test_assert_ok_failure() {
        let err: Result<i32, String> = Err("bad".into());
        assert_ok!(err);
    }

    #[test]
    fn test_assert_same_value() {
        assert_same_value!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_same_value!(Value::Undefined, Value::Undefined);
    }

    #[test]
    #[should_panic(expected = "Object.is")]
    fn test_assert_same_value_signed_zero() {
        assert_same_value!(Value::Number(0.0), Value::Number(-0.0));
    }
}
