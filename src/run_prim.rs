//! Primitive bodies
//!
//! For the algorithms themselves, see [`crate::algorithm`].
//! Bodies receive their arguments after the call engine has recursed and
//! padded them, structurally right operand first.

use std::cmp::Ordering;

use crate::{
    algorithm::{self, pervade::*},
    JoeError, JoeResult, Primitive, Value,
};

/// Execute a primitive on its arguments
pub fn run_prim(prim: Primitive, right: Value, left: Option<Value>) -> JoeResult<Value> {
    use Primitive::*;
    let r = right;
    Ok(match (prim, left) {
        // Arithmetic
        (Add, None) => r,
        (Add, Some(l)) => add::run(&l, &r)?,
        (Sub, None) => num_mono("negate", &r, |n| -n)?,
        (Sub, Some(l)) => sub::run(&l, &r)?,
        (Mul, None) => num_mono("take the sign of", &r, sign::num)?,
        (Mul, Some(l)) => num_op("multiply", &l, &r, mul::num_num)?,
        (Div, None) => num_mono("take the reciprocal of", &r, |n| 1.0 / n)?,
        (Div, Some(l)) => num_op("divide", &l, &r, div::num_num)?,
        (Residue, None) => num_mono("take the absolute value of", &r, f64::abs)?,
        (Residue, Some(l)) => num_op("take the modulus of", &l, &r, modulus::num_num)?,
        (Factorial, None) => num_mono("take the factorial of", &r, factorial::num)?,
        (Factorial, Some(l)) => num_op("choose", &l, &r, factorial::choose)?,
        // Comparison
        (Less, None) => compare(&r, &0.0.into(), Ordering::is_lt),
        (Less, Some(l)) => compare(&l, &r, Ordering::is_lt),
        (Greater, None) => compare(&r, &0.0.into(), Ordering::is_gt),
        (Greater, Some(l)) => compare(&l, &r, Ordering::is_gt),
        (Equal, None) => compare(&r, &0.0.into(), Ordering::is_eq),
        (Equal, Some(l)) => compare(&l, &r, Ordering::is_eq),
        (LessEq, None) => num_mono("decrement", &r, |n| n - 1.0)?,
        (LessEq, Some(l)) => compare(&l, &r, Ordering::is_le),
        (GreaterEq, None) => num_mono("increment", &r, |n| n + 1.0)?,
        (GreaterEq, Some(l)) => compare(&l, &r, Ordering::is_ge),
        (Min | Max, None) => r,
        (Min, Some(l)) => select(&l, &r, Ordering::Less),
        (Max, Some(l)) => select(&l, &r, Ordering::Greater),
        // Structure
        (Append, None) => r.wrap(),
        (Append, Some(l)) => l.append(r),
        (Join, None) => r.raze(),
        (Join, Some(l)) => l.join(r),
        (Pair, None) => r.flatten(),
        (Pair, Some(l)) => Value::from_iter([l, r]),
        (Replicate, None) => r.len().into(),
        (Replicate, Some(l)) => r.replicate(&l)?,
        (Sort, None) => r.sorted(),
        (Sort, Some(l)) => l.permute_by(&r)?,
        (Range, None) => algorithm::range(num(&r, "Range bound")?)?,
        (Range, Some(l)) => {
            algorithm::range_between(num(&l, "Range bound")?, num(&r, "Range bound")?)?
        }
        (Split, None) => r.split(&' '.into())?,
        (Split, Some(l)) => r.split(&l)?,
        (Splice, None) => r.raze(),
        (Splice, Some(l)) => r.splice(&l),
        (Table, None) => {
            let dims = r;
            let total = (algorithm::as_ints(&dims, "Dimension")?.iter())
                .try_fold(1i64, |total, &d| total.checked_mul(d.max(0)))
                .ok_or_else(|| JoeError::shape("Reshape dimensions are too large"))?;
            algorithm::range(total as f64)?.reshape(&dims)?
        }
        (Table, Some(l)) => r.reshape(&l)?,
        (Reverse, _) => r.reverse(),
        (Wrap, None) => r.wrap(),
        (Wrap, Some(l)) => r.wrap_n(&l)?,
        (Nest, _) => r.wrap().wrap(),
        // Set
        (Remove, None) => r.remove(&0.0.into()),
        (Remove, Some(l)) => r.remove(&l),
        (Nub, None) => r.nub(),
        (Nub, Some(l)) => r.keep(&l),
        (IndexOf, None) => r.truthy_indices(),
        (IndexOf, Some(l)) => r.index_of(&l),
        // Selection
        (Count, None) => r.count(&1.0.into()),
        (Count, Some(l)) => r.count(&l),
        (Last, None) => r.last(),
        (Last, Some(l)) => r.take_last(&l)?,
        (First, None) => r.first(),
        (First, Some(l)) => r.take(&l)?,
        (DropFirst, None) => r.drop_first(&1.0.into())?,
        (DropFirst, Some(l)) => r.drop_first(&l)?,
        (DropLast, None) => r.drop_last(&1.0.into())?,
        (DropLast, Some(l)) => r.drop_last(&l)?,
        (Index, None) => r.len().into(),
        (Index, Some(l)) => r.pick(&l)?,
        // Conversion
        (Parse, _) => r.parse_num()?,
        (FromBase, None) => r.from_digits(10.0)?,
        (FromBase, Some(l)) => r.from_digits(num(&l, "Base")?)?,
        (ToBase, None) => algorithm::digits(num(&r, "Number")?, 10.0)?,
        (ToBase, Some(l)) => algorithm::digits(num(&r, "Number")?, num(&l, "Base")?)?,
        (Format, _) => r.format(),
        // Misc
        (Identity, _) => r,
        (Left, l) => l.unwrap_or(r),
        (Depth, _) => r.depth().into(),
        (Len, _) => r.len().into(),
        (Print, None) => {
            println!("{}", r.show());
            0.0.into()
        }
        (Print, Some(l)) => {
            println!("{}", l.fill_template(r)?);
            0.0.into()
        }
    })
}

fn num(value: &Value, what: &str) -> JoeResult<f64> {
    value.as_num().ok_or_else(|| {
        crate::JoeError::type_error(format!("{what} must be a number, but it is {value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(ns: &[f64]) -> Value {
        ns.iter().copied().map(Value::from).collect()
    }

    fn dyadic(prim: Primitive, l: impl Into<Value>, r: impl Into<Value>) -> Value {
        run_prim(prim, r.into(), Some(l.into())).unwrap()
    }

    fn monadic(prim: Primitive, r: impl Into<Value>) -> Value {
        run_prim(prim, r.into(), None).unwrap()
    }

    #[test]
    fn arithmetic_is_left_to_right() {
        assert_eq!(dyadic(Primitive::Sub, 5.0, 3.0), Value::from(2.0));
        assert_eq!(dyadic(Primitive::Div, 10.0, 4.0), Value::from(2.5));
        assert_eq!(dyadic(Primitive::Residue, 3.0, 10.0), Value::from(1.0));
        assert_eq!(dyadic(Primitive::Factorial, 4.0, 2.0), Value::from(6.0));
        assert_eq!(dyadic(Primitive::Less, 1.0, 2.0), Value::from(1.0));
        assert_eq!(dyadic(Primitive::GreaterEq, 1.0, 2.0), Value::from(0.0));
        assert_eq!(monadic(Primitive::LessEq, 3.0), Value::from(2.0));
        assert_eq!(monadic(Primitive::Mul, -7.0), Value::from(-1.0));
        assert_eq!(dyadic(Primitive::Max, 2.0, 9.0), Value::from(9.0));
    }

    #[test]
    fn structure() {
        assert_eq!(dyadic(Primitive::Append, nums(&[1.0]), 2.0), nums(&[1.0, 2.0]));
        assert_eq!(monadic(Primitive::Append, 2.0), nums(&[2.0]));
        assert_eq!(
            dyadic(Primitive::Pair, 1.0, 2.0),
            nums(&[1.0, 2.0])
        );
        assert_eq!(
            monadic(Primitive::Table, nums(&[2.0, 2.0])).to_string(),
            "[[0,1],[2,3]]"
        );
        assert_eq!(
            dyadic(Primitive::Sort, "abc", nums(&[3.0, 1.0, 2.0])),
            Value::from("bca")
        );
        assert_eq!(dyadic(Primitive::Range, 2.0, 4.0), nums(&[2.0, 3.0, 4.0]));
        assert_eq!(dyadic(Primitive::Wrap, 2.0, 1.0).to_string(), "[[1]]");
        assert_eq!(monadic(Primitive::Nest, 5.0).to_string(), "[[5]]");
        assert_eq!(dyadic(Primitive::Nest, 9.0, nums(&[1.0])).to_string(), "[[[1]]]");
        assert_eq!(
            monadic(Primitive::Table, nums(&[2.0, 3.0])).to_string(),
            "[[0,1],[2,3],[4,5]]"
        );
        assert!(run_prim(Primitive::Table, nums(&[1e10, 1e10]), None).is_err());
    }

    #[test]
    fn printing_yields_zero() {
        assert_eq!(monadic(Primitive::Print, "hello"), Value::from(0.0));
        assert_eq!(dyadic(Primitive::Print, "x={}", nums(&[4.0])), Value::from(0.0));
        assert!(run_prim(Primitive::Print, nums(&[]), Some("{}".into())).is_err());
    }

    #[test]
    fn selection() {
        let v = nums(&[4.0, 5.0, 6.0]);
        assert_eq!(monadic(Primitive::Last, v.clone()), Value::from(6.0));
        assert_eq!(monadic(Primitive::First, v.clone()), Value::from(4.0));
        assert_eq!(monadic(Primitive::Index, v.clone()), Value::from(3.0));
        assert_eq!(dyadic(Primitive::Index, -1.0, v.clone()), Value::from(6.0));
        assert_eq!(monadic(Primitive::DropFirst, v.clone()), nums(&[5.0, 6.0]));
        assert_eq!(monadic(Primitive::Last, Value::empty()), Value::empty());
        assert_eq!(dyadic(Primitive::Count, 5.0, v), Value::from(1.0));
        assert!(run_prim(Primitive::Index, nums(&[1.0]), Some(5.0.into())).is_err());
    }

    #[test]
    fn conversion() {
        assert_eq!(monadic(Primitive::ToBase, 42.0), nums(&[4.0, 2.0]));
        assert_eq!(dyadic(Primitive::FromBase, 2.0, nums(&[1.0, 1.0])), Value::from(3.0));
        assert_eq!(monadic(Primitive::Parse, "12"), Value::from(12.0));
        assert_eq!(monadic(Primitive::Format, 3.5), Value::from("3.5"));
        assert_eq!(monadic(Primitive::Remove, nums(&[0.0, 1.0, 0.0])), nums(&[1.0]));
        assert_eq!(monadic(Primitive::IndexOf, nums(&[0.0, 1.0, 1.0])), nums(&[1.0, 2.0]));
    }

    #[test]
    fn type_errors() {
        assert!(run_prim(Primitive::Mul, 'a'.into(), Some(2.0.into())).is_err());
        assert!(run_prim(Primitive::Range, 'a'.into(), None).is_err());
    }
}
