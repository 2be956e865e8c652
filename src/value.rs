use std::fmt;

use crate::callable::Callable;

/// Runtime value of a Lox expression.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    Callable(Callable),
}

impl Value {
    /// `nil` and `false` are falsy; everything else (including `0` and `""`)
    /// is truthy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }
}

/// Same variant and same content.  Numbers use IEEE‑754 equality, so
/// `NaN != NaN`; callables compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
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

/// Render a number the way `print` shows it.
///
/// * integral values print without a fraction: `3`, `-0`;
/// * magnitudes in `[1e-4, 1e21)` print positionally in shortest form: `2.5`;
/// * anything else uses an exponent with a sign and at least two digits:
///   `1e+21`, `1.5e-07`;
/// * `+Inf`, `-Inf` and `NaN` for the non‑finite values.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "+Inf" } else { "-Inf" });
    }
    if n == 0.0 {
        return f.write_str(if n.is_sign_negative() { "-0" } else { "0" });
    }

    let magnitude: f64 = n.abs();

    if !(1e-4..1e21).contains(&magnitude) {
        // `{:e}` is the shortest round‑trip mantissa: "1e21", "-1.5e-7".
        let scientific: String = format!("{:e}", n);
        let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or_default();
        let sign: char = if exponent < 0 { '-' } else { '+' };

        return write!(f, "{}e{}{:02}", mantissa, sign, exponent.unsigned_abs());
    }

    if n.fract() == 0.0 && magnitude < 1e15 {
        let mut digits: itoa::Buffer = itoa::Buffer::new();
        return f.write_str(digits.format(n as i64));
    }

    write!(f, "{}", n)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Number(n) => write_number(f, *n),

            Value::String(s) => write!(f, "{}", s),

            Value::Callable(c) => write!(f, "{}", c),
        }
    }
}
