// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript value and lexer macros.
//!
//! The value macros expand to `::spacey_value` paths, so the calling crate
//! must depend on `spacey-value`.

/// Create an ordinary object `Value` from key-value pairs.
///
/// Values go through `Value::from`.
///
/// # Example
///
/// ```
/// use spacey_macros::js_object;
/// use spacey_value::Value;
///
/// let obj = js_object! {
///     "name" => "Alice",
///     "age" => 30,
/// };
///
/// assert_eq!(obj.get(&"age".into()).unwrap(), Value::from(30));
/// assert_eq!(obj.inspect(), "{ name: 'Alice', age: 30 }");
/// ```
#[macro_export]
macro_rules! js_object {
    () => {
        ::spacey_value::Value::object(::spacey_value::Object::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut object = ::spacey_value::Object::new();
        $(object.set(
            ::spacey_value::PropertyKey::from($key),
            ::spacey_value::Value::from($value),
        );)+
        ::spacey_value::Value::object(object)
    }};
}

/// Create an array `Value`.
///
/// # Example
///
/// ```
/// use spacey_macros::js_array;
///
/// let list = js_array![1, "two", true];
/// assert_eq!(list.inspect(), "[ 1, 'two', true ]");
/// ```
#[macro_export]
macro_rules! js_array {
    () => {
        ::spacey_value::Value::array(Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        ::spacey_value::Value::array(vec![$(::spacey_value::Value::from($value)),+])
    };
}

/// Create a native function `Value`.
///
/// With a leading name the function is named; without one it is anonymous.
///
/// # Example
///
/// ```
/// use spacey_macros::js_function;
/// use spacey_value::Value;
///
/// let double = js_function!("double", |_this, args| {
///     Ok(Value::from(args[0].to_number() * 2.0))
/// });
/// let anon = js_function!(|_this, _args| Ok(Value::Undefined));
///
/// assert_eq!(double.inspect(), "[Function: double]");
/// assert_eq!(anon.inspect(), "[Function (anonymous)]");
///
/// let result = double.as_function().unwrap().call(&Value::Undefined, &[Value::from(21)]);
/// assert_eq!(result.unwrap(), Value::from(42));
/// ```
#[macro_export]
macro_rules! js_function {
    (|$this:pat_param, $args:pat_param| $body:expr) => {
        ::spacey_value::Value::from(::spacey_value::Function::anonymous(
            0,
            move |$this: &::spacey_value::Value, $args: &[::spacey_value::Value]| $body,
        ))
    };
    ($name:expr, |$this:pat_param, $args:pat_param| $body:expr) => {
        ::spacey_value::Value::from(::spacey_value::Function::native(
            $name,
            0,
            move |$this: &::spacey_value::Value, $args: &[::spacey_value::Value]| $body,
        ))
    };
}

/// Define a JavaScript keyword lookup table.
///
/// # Example
///
/// ```
/// use spacey_macros::js_keywords;
///
/// js_keywords! {
///     Keyword {
///         "let" => Let,
///         "const" => Const,
///     }
/// }
///
/// assert_eq!(Keyword::lookup("let"), Some(Keyword::Let));
/// assert_eq!(Keyword::lookup("unknown"), None);
/// assert_eq!(Keyword::Const.to_string(), "const");
/// ```
#[macro_export]
macro_rules! js_keywords {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($keyword:literal => $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[allow(missing_docs)]
                $variant
            ),+
        }

        impl $name {
            /// Look up a keyword by its source text
            pub fn lookup(s: &str) -> Option<Self> {
                match s {
                    $($keyword => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// The keyword's source text
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $keyword,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

/// Check if a character is a valid JavaScript identifier start.
///
/// # Example
///
/// ```
/// use spacey_macros::is_id_start;
///
/// assert!(is_id_start!('a'));
/// assert!(is_id_start!('_'));
/// assert!(is_id_start!('$'));
/// assert!(!is_id_start!('1'));
/// ```
#[macro_export]
macro_rules! is_id_start {
    ($ch:expr) => {{
        let c: char = $ch;
        c.is_alphabetic() || c == '_' || c == '$'
    }};
}

/// Check if a character is a valid JavaScript identifier continuation.
///
/// # Example
///
/// ```
/// use spacey_macros::is_id_continue;
///
/// assert!(is_id_continue!('a'));
/// assert!(is_id_continue!('1'));
/// assert!(is_id_continue!('_'));
/// assert!(!is_id_continue!('-'));
/// ```
#[macro_export]
macro_rules! is_id_continue {
    ($ch:expr) => {{
        let c: char = $ch;
        c.is_alphanumeric() || c == '_' || c == '$'
    }};
}

#[cfg(test)]
mod tests {
    use spacey_value::{PropertyKey, Value};

    #[test]
    fn test_js_object_keeps_insertion_order() {
        let obj = js_object! {
            "b" => 1,
            "a" => "x",
        };
        assert_eq!(obj.keys(), vec!["b".to_string(), "a".to_string()]);
        assert!(obj.is_plain_object());
    }

    #[test]
    fn test_js_object_nested() {
        let obj = js_object! {
            "inner" => js_object! { "deep" => true },
            "list" => js_array![1, 2],
        };
        assert_eq!(obj.inspect(), "{ inner: { deep: true }, list: [ 1, 2 ] }");
    }

    #[test]
    fn test_empty_literals() {
        assert_eq!(js_object! {}.inspect(), "{}");
        assert_eq!(js_array![].inspect(), "[]");
    }

    #[test]
    fn test_js_function_sees_this() {
        let getter = js_function!("get", |this, _args| this.get(&PropertyKey::from("x")));
        let receiver = js_object! { "x" => 7 };

        let result = getter.as_function().unwrap().call(&receiver, &[]);
        assert_eq!(result.unwrap(), Value::from(7));
    }

    #[test]
    fn test_js_keywords() {
        js_keywords! {
            Word {
                "if" => If,
                "else" => Else,
            }
        }

        assert_eq!(Word::lookup("else"), Some(Word::Else));
        assert_eq!(Word::If.as_str(), "if");
        assert_eq!(Word::lookup("elif"), None);
    }

    #[test]
    fn test_identifier_chars() {
        assert!(is_id_start!('é'));
        assert!(!is_id_start!('-'));
        assert!(is_id_continue!('9'));
        assert!(!is_id_continue!(' '));
    }
}
