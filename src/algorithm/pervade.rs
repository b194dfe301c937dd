//! Scalar bodies of the arithmetic and comparison primitives
//!
//! The call engine recurses rank 0 functions down to scalars, so these only
//! ever see numbers and characters.

use std::cmp::Ordering;

use crate::{JoeError, JoeResult, Value};

fn char_offset(c: char, n: f64) -> JoeResult<char> {
    let code = c as i64 + n as i64;
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| JoeError::type_error(format!("{code} is not a valid character")))
}

fn scalar_error(name: &str, a: &Value, b: Option<&Value>) -> JoeError {
    match b {
        Some(b) => JoeError::type_error(format!("Cannot {name} {a} and {b}")),
        None => JoeError::type_error(format!("Cannot {name} {a}")),
    }
}

pub mod add {
    use super::*;
    pub fn num_num(a: f64, b: f64) -> f64 {
        a + b
    }
    pub fn run(a: &Value, b: &Value) -> JoeResult<Value> {
        Ok(match (a, b) {
            (Value::Num(a), Value::Num(b)) => num_num(*a, *b).into(),
            (Value::Char(c), Value::Num(n)) | (Value::Num(n), Value::Char(c)) => {
                char_offset(*c, *n)?.into()
            }
            _ => return Err(scalar_error("add", a, Some(b))),
        })
    }
}

pub mod sub {
    use super::*;
    pub fn num_num(a: f64, b: f64) -> f64 {
        a - b
    }
    pub fn run(a: &Value, b: &Value) -> JoeResult<Value> {
        Ok(match (a, b) {
            (Value::Num(a), Value::Num(b)) => num_num(*a, *b).into(),
            (Value::Char(c), Value::Num(n)) => char_offset(*c, -*n)?.into(),
            (Value::Char(x), Value::Char(y)) => Value::from((*x as i64 - *y as i64) as f64),
            _ => return Err(scalar_error("subtract", a, Some(b))),
        })
    }
}

pub mod mul {
    pub fn num_num(a: f64, b: f64) -> f64 {
        a * b
    }
}

pub mod div {
    pub fn num_num(a: f64, b: f64) -> f64 {
        a / b
    }
}

pub mod modulus {
    /// The remainder takes the sign of the divisor
    pub fn num_num(divisor: f64, n: f64) -> f64 {
        let r = n % divisor;
        if r != 0.0 && (r < 0.0) != (divisor < 0.0) {
            r + divisor
        } else {
            r
        }
    }
}

pub mod factorial {
    pub fn num(n: f64) -> f64 {
        if n < 0.0 || n.fract() != 0.0 {
            return f64::NAN;
        }
        // 171! overflows an f64
        if n > 170.0 {
            return f64::INFINITY;
        }
        (1..=n as u64).fold(1.0, |acc, i| acc * i as f64)
    }
    /// The number of ways to choose `k` items from `n`
    pub fn choose(n: f64, k: f64) -> f64 {
        if k < 0.0 || k.fract() != 0.0 || k > n {
            return 0.0;
        }
        let k = k.min(n - k) as u64;
        let mut acc = 1.0;
        for i in 0..k {
            acc = acc * (n - i as f64) / (i + 1) as f64;
            if acc.is_infinite() {
                break;
            }
        }
        acc
    }
}

pub mod sign {
    pub fn num(n: f64) -> f64 {
        if n > 0.0 {
            1.0
        } else if n < 0.0 {
            -1.0
        } else {
            n
        }
    }
}

/// Run a numeric binary operation, rejecting characters
pub fn num_op(
    name: &str,
    a: &Value,
    b: &Value,
    f: impl Fn(f64, f64) -> f64,
) -> JoeResult<Value> {
    match (a, b) {
        (Value::Num(a), Value::Num(b)) => Ok(f(*a, *b).into()),
        _ => Err(scalar_error(name, a, Some(b))),
    }
}

/// Run a numeric unary operation, rejecting characters
pub fn num_mono(name: &str, a: &Value, f: impl Fn(f64) -> f64) -> JoeResult<Value> {
    match a {
        Value::Num(a) => Ok(f(*a).into()),
        _ => Err(scalar_error(name, a, None)),
    }
}

/// Compare two scalars in the total order
pub fn compare(a: &Value, b: &Value, f: impl Fn(Ordering) -> bool) -> Value {
    f(a.cmp(b)).into()
}

/// The lesser or greater of two scalars
pub fn select(a: &Value, b: &Value, want: Ordering) -> Value {
    if b.cmp(a) == want {
        b.clone()
    } else {
        a.clone()
    }
}
