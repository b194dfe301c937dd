//! Adverb, conjunction, and train bodies

use ecow::EcoVec;
use tracing::trace;

use crate::{
    algorithm::as_int,
    run::operand_function,
    Adverb, Conjunction, Function, Joe, JoeError, JoeResult, Operand, Value,
};

impl Joe {
    pub(crate) fn run_adverb(
        &mut self,
        adverb: Adverb,
        f: &Function,
        left: Option<Value>,
        right: Value,
    ) -> JoeResult<Value> {
        trace!(%adverb, %f, "adverb");
        match (adverb, left) {
            (Adverb::Fold, None) => {
                let mut cells = right.into_cells();
                let Some(seed) = cells.pop() else {
                    return Ok(Value::empty());
                };
                self.fold(f, cells, seed)
            }
            (Adverb::Fold, Some(seed)) => self.fold(f, right.into_cells(), seed),
            (Adverb::Selfie, None) => self.call(f, Some(right.clone()), right),
            (Adverb::Selfie | Adverb::Map, left) => self.call(f, left, right),
            (Adverb::Windows, left) => {
                let cells = right.into_cells();
                let windows: Vec<Value> = match left {
                    None => (1..=cells.len())
                        .map(|n| cells[..n].iter().cloned().collect())
                        .collect(),
                    Some(size) => windows(&cells, &size)?,
                };
                (windows.into_iter())
                    .map(|window| self.call(f, None, window))
                    .collect()
            }
        }
    }
    /// Fold cells from the right, with the accumulator as the right argument
    fn fold(&mut self, f: &Function, cells: EcoVec<Value>, seed: Value) -> JoeResult<Value> {
        let mut acc = seed;
        for cell in cells.into_iter().rev() {
            acc = self.call(f, Some(cell), acc)?;
        }
        Ok(acc)
    }
    pub(crate) fn run_conjunction(
        &mut self,
        conj: Conjunction,
        a: &Operand,
        b: &Operand,
        left: Option<Value>,
        right: Value,
    ) -> JoeResult<Value> {
        trace!(%conj, "conjunction");
        use Conjunction::*;
        match conj {
            Rank => {
                let f = operand_function(b, conj)?;
                self.call(f, left, right)
            }
            SeedFold => {
                let f = operand_function(b, conj)?;
                match left {
                    None => {
                        let cells = right.into_cells();
                        if cells.is_empty() {
                            return Ok(Value::empty());
                        }
                        let seed = operand_value(a, conj)?;
                        self.fold(f, cells, seed)
                    }
                    left => self.call(f, left, right),
                }
            }
            Compose | ComposeRank => {
                let d = operand_function(b, conj)?;
                if conj == Compose {
                    if let Some(agenda) = self.agenda_of(a)? {
                        return self.dispatch(&agenda, d, left, right);
                    }
                }
                let g = operand_function(a, conj)?;
                let inner = self.call(d, left, right)?;
                self.call(g, None, inner)
            }
            Hook | HookFlip | HookRight => {
                let g = operand_function(a, conj)?;
                let f = operand_function(b, conj)?;
                let inner = self.call(f, left.clone(), right.clone())?;
                let fixed = match conj {
                    Hook => left.unwrap_or(right),
                    HookRight => right,
                    _ => {
                        let other = left.unwrap_or(right);
                        return self.call(g, Some(inner), other);
                    }
                };
                self.call(g, Some(fixed), inner)
            }
            Agenda => Err(JoeError::type_error(format!(
                "The agenda {a}`{b} must be dispatched with @ before it is called"
            ))),
        }
    }
    /// Pick a function from an agenda by the result of `d` and call it
    fn dispatch(
        &mut self,
        agenda: &[Function],
        d: &Function,
        left: Option<Value>,
        right: Value,
    ) -> JoeResult<Value> {
        let index = self.call(d, left.clone(), right.clone())?;
        let i = as_int(&index, "Agenda index")?;
        let f = usize::try_from(i)
            .ok()
            .and_then(|i| agenda.get(i))
            .ok_or_else(|| {
                JoeError::shape(format!(
                    "Agenda index {i} is out of bounds of {} functions",
                    agenda.len()
                ))
            })?;
        trace!(index = i, %f, "dispatch");
        self.call(f, left, right)
    }
    /// Call a fork train
    ///
    /// Three functions fork, two hook, and longer trains group from the right.
    pub(crate) fn run_train(
        &mut self,
        fs: &[Function],
        left: Option<Value>,
        right: Value,
    ) -> JoeResult<Value> {
        match fs {
            [] => Ok(right),
            [f] => self.call(f, left, right),
            [f, g, rest @ ..] if !rest.is_empty() && rest.len() % 2 == 1 => {
                let fx = self.call(f, left.clone(), right.clone())?;
                let hx = self.nested(|joe| joe.run_train(rest, left, right))?;
                self.call(g, Some(fx), hx)
            }
            [f, rest @ ..] => {
                let gx = self.nested(|joe| joe.run_train(rest, left.clone(), right.clone()))?;
                self.call(f, Some(left.unwrap_or(right)), gx)
            }
        }
    }
}

fn operand_value(operand: &Operand, conj: Conjunction) -> JoeResult<Value> {
    operand.as_value().cloned().ok_or_else(|| {
        JoeError::type_error(format!("{conj} expects a value operand, not a function"))
    })
}

/// Sliding windows of a positive size, or chunks of a negative one
fn windows(cells: &[Value], size: &Value) -> JoeResult<Vec<Value>> {
    let n = as_int(size, "Window size")?;
    let to_value = |window: &[Value]| window.iter().cloned().collect::<Value>();
    Ok(match n {
        0 => return Err(JoeError::shape("Window size cannot be zero")),
        n if n > 0 => cells.windows(n as usize).map(to_value).collect(),
        n => cells.chunks(n.unsigned_abs() as usize).map(to_value).collect(),
    })
}
