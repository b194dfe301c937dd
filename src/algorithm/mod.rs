//! Algorithms behind the primitive bodies

mod dyadic;
mod monadic;
pub mod pervade;

pub use dyadic::*;
pub use monadic::*;

use crate::{JoeError, JoeResult, Value};

/// `i64::MIN` is exactly representable, `i64::MAX` is not
const I64_MIN: f64 = i64::MIN as f64;

/// Interpret a value as an integer
pub fn as_int(value: &Value, what: &str) -> JoeResult<i64> {
    match value {
        Value::Num(n) if n.fract() == 0.0 && (I64_MIN..-I64_MIN).contains(n) => Ok(*n as i64),
        Value::Num(n) if n.fract() == 0.0 => Err(JoeError::shape(format!(
            "{what} {n} is out of range"
        ))),
        Value::Num(n) => Err(JoeError::type_error(format!(
            "{what} must be an integer, but it is {n}"
        ))),
        value => Err(JoeError::type_error(format!(
            "{what} must be an integer, but it is {value}"
        ))),
    }
}

/// Interpret a value as a non-negative integer
pub fn as_nat(value: &Value, what: &str) -> JoeResult<usize> {
    let n = as_int(value, what)?;
    usize::try_from(n)
        .map_err(|_| JoeError::shape(format!("{what} must be non-negative, but it is {n}")))
}

/// Interpret a value as a list of integers
///
/// A scalar counts as a one-element list.
pub fn as_ints(value: &Value, what: &str) -> JoeResult<Vec<i64>> {
    match value {
        Value::Seq(cells) => cells.iter().map(|cell| as_int(cell, what)).collect(),
        scalar => Ok(vec![as_int(scalar, what)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_conversion() {
        assert_eq!(as_int(&3.0.into(), "n").unwrap(), 3);
        assert!(as_int(&3.5.into(), "n").is_err());
        assert!(as_int(&'a'.into(), "n").is_err());
        assert!(as_nat(&(-1.0).into(), "n").is_err());
        assert_eq!(
            as_ints(&Value::from_iter([2.0.into(), 3.0.into()]), "dims").unwrap(),
            [2, 3]
        );
        assert_eq!(as_ints(&4.0.into(), "dims").unwrap(), [4]);
        assert!(matches!(as_int(&(-1e19).into(), "n"), Err(JoeError::Shape(_))));
        assert!(matches!(as_int(&1e19.into(), "n"), Err(JoeError::Shape(_))));
        assert!(as_int(&f64::INFINITY.into(), "n").is_err());
        assert!(as_int(&f64::NAN.into(), "n").is_err());
    }
}
