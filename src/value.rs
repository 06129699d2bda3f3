//! Dynamic values compared and rendered by the assertion engine.
//!
//! A [`Value`] is what `expect(..)` and `to_be(..)` both convert their
//! arguments into, so values of different Rust types can be compared (and
//! reported) against each other: `expect("5").to_be(5)` is a legal call that
//! fails with both sides rendered.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// Anything that can sit behind [`Value::Object`].
///
/// Rendering goes through JSON first and falls back to `Debug` when the
/// serializer refuses the value.
pub trait Inspect: fmt::Debug {
    fn to_json(&self) -> serde_json::Result<String>;
}

impl<T: Serialize + fmt::Debug + ?Sized> Inspect for T {
    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Represents a value under test.
///
/// # Examples
///
/// ```rust
/// use tally::value::Value;
/// let n = Value::from(3);
/// assert_eq!(n.type_name(), "Number");
/// let s = Value::from("hello");
/// assert_eq!(s.render(), "\"hello\"");
/// assert!(Value::default().is_null());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    /// A shared object. Two objects are the same value only when they are the
    /// same allocation.
    Object(Rc<dyn Inspect>),
}

impl Value {
    /// Wraps `value` in a fresh shared allocation.
    pub fn object<T: Inspect + 'static>(value: T) -> Self {
        Value::Object(Rc::new(value))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::BigInt(_) => "BigInt",
            Value::String(_) => "String",
            Value::Object(_) => "Object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Same-value equality.
    ///
    /// Numbers compare by bit pattern except that every NaN equals every
    /// other NaN, so `0` and `-0` are different values and `NaN` is equal to
    /// itself. Objects compare by identity, never structurally. Values of
    /// different kinds are never equal.
    ///
    /// ```rust
    /// use tally::value::Value;
    /// assert!(Value::from(f64::NAN).same_value(&Value::from(f64::NAN)));
    /// assert!(!Value::from(0.0).same_value(&Value::from(-0.0)));
    /// assert!(!Value::from("5").same_value(&Value::from(5)));
    /// ```
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
            }
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }

    /// Stable textual rendering used in assertion messages.
    pub fn render(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => render_number(*n),
            Value::BigInt(n) => format!("{}n", n),
            Value::String(s) => serde_json::to_string(s).unwrap_or_else(|_| format!("{:?}", s)),
            Value::Object(obj) => obj.to_json().unwrap_or_else(|_| format!("{:?}", obj)),
        }
    }
}

fn render_number(n: f64) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 && n.is_sign_negative() {
        return "-0".to_string();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || (magnitude > 0.0 && magnitude < 1e-6) {
        return format!("{:e}", n);
    }
    // f64's Display already prints NaN and integral values without a fraction.
    n.to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(f64, f32, i8, i16, i32, u8, u16, u32);

/// Largest integer magnitude an `f64` holds exactly along with all its neighbours.
pub const MAX_SAFE_INTEGER: u128 = (1 << 53) - 1;

// Wider integers stay numbers while exact and become big integers beyond that,
// so distinct integers never collapse into one value.
macro_rules! wide_integer_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    let wide = n as i128;
                    if wide.unsigned_abs() <= MAX_SAFE_INTEGER {
                        Value::Number(n as f64)
                    } else {
                        Value::BigInt(wide)
                    }
                }
            }
        )*
    };
}

wide_integer_from!(i64, isize, u64, usize);

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Inspect + 'static> From<Rc<T>> for Value {
    fn from(obj: Rc<T>) -> Self {
        Value::Object(obj)
    }
}
