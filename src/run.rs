//! The interpreter and its call engine

use std::{fs, path::Path};

use tracing::{trace, warn};

use crate::{
    algorithm::as_ints, run_prim::run_prim, Adverb, Config, Conjunction, Env, Function, JoeError,
    JoeResult, Memo, MemoStats, MemoStrategy, Operand, PadSpec, RankSpec, Value, INFINITE_RANK,
    PRELUDE,
};

/// The Joe interpreter
///
/// One interpreter models one session. Bindings made by one load are visible
/// to every later one.
#[derive(Debug, Clone)]
pub struct Joe {
    pub(crate) env: Env,
    pub(crate) config: Config,
    pub(crate) memo: Memo,
    pub(crate) depth: usize,
}

impl Default for Joe {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Joe {
    /// Create an interpreter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }
    /// Create an interpreter with the prelude loaded
    pub fn with_config(config: Config) -> Self {
        let mut joe = Self::without_prelude(config);
        if let Err(e) = joe.load_str(PRELUDE) {
            warn!("failed to load the prelude: {e}");
        }
        joe
    }
    /// Create an interpreter with only the built-in bindings
    pub fn without_prelude(config: Config) -> Self {
        Joe {
            env: Env::default(),
            memo: Memo::new(config.memo_capacity),
            config,
            depth: 0,
        }
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }
    pub fn env(&self) -> &Env {
        &self.env
    }
    pub fn memo_stats(&self) -> MemoStats {
        self.memo.stats()
    }
    /// Load and run a Joe file, returning the result of its last statement
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> JoeResult<Option<Operand>> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|e| JoeError::Load(path.into(), e))?;
        self.load_str(&input)
    }
    /// Bind a name to a function
    ///
    /// Cached results are dropped, since they may depend on the old binding.
    pub fn bind_function(&mut self, name: impl Into<crate::Ident>, f: Function) {
        self.env.bind_function(name.into(), f);
        self.memo.clear();
    }
    /// Bind a name to a value
    pub fn bind_variable(&mut self, name: impl Into<crate::Ident>, value: Value) {
        if self.env.bind_variable(name.into(), value) {
            self.memo.clear();
        }
    }
    /// Look up the function a name is bound to
    pub fn resolve(&self, name: &str) -> JoeResult<Function> {
        self.env
            .function(name)
            .cloned()
            .ok_or_else(|| JoeError::Name(name.into()))
    }
    /// Call a function, monadically if `left` is `None`
    pub fn call(&mut self, f: &Function, left: Option<Value>, right: Value) -> JoeResult<Value> {
        self.call_at(f, left, right, 0, 0)
    }
    /// Enter one level of nesting, failing if the limit is reached
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> JoeResult<T>) -> JoeResult<T> {
        if self.depth >= self.config.recursion_limit {
            return Err(JoeError::RecursionLimit(self.config.recursion_limit));
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }
    fn call_at(
        &mut self,
        f: &Function,
        left: Option<Value>,
        right: Value,
        ldepth: i32,
        rdepth: i32,
    ) -> JoeResult<Value> {
        self.nested(|joe| {
            if ldepth == 0 && rdepth == 0 && joe.should_memoize(f) {
                let key = (f.clone(), left, right);
                if let Some(value) = joe.memo.get(&key) {
                    trace!(function = %f, "memo hit");
                    return Ok(value);
                }
                let value = joe.conform(f, key.1.clone(), key.2.clone(), 0, 0)?;
                joe.memo.insert(key, value.clone());
                Ok(value)
            } else {
                joe.conform(f, left, right, ldepth, rdepth)
            }
        })
    }
    fn should_memoize(&self, f: &Function) -> bool {
        match self.config.memo {
            MemoStrategy::Off => false,
            MemoStrategy::Named => {
                matches!(f, Function::Bound(name) if self.env.is_user_function(name))
            }
            MemoStrategy::All => f.as_primitive().is_none(),
        }
    }
    /// Decide whether to recurse into the arguments or apply the body
    fn conform(
        &mut self,
        f: &Function,
        left: Option<Value>,
        right: Value,
        ldepth: i32,
        rdepth: i32,
    ) -> JoeResult<Value> {
        let rank = self.rank_of(f)?;
        let Some(left) = left else {
            if recurses(rank.monadic, &right, rdepth) {
                return (right.into_cells().into_iter())
                    .map(|cell| self.call_at(f, None, cell, ldepth, rdepth - 1))
                    .collect();
            }
            let pad = self.pad_of(f)?;
            return self.invoke(f, None, pad_to(right, pad.monadic));
        };
        let left_recurses = recurses(rank.left, &left, ldepth);
        let right_recurses = recurses(rank.right, &right, rdepth);
        if left_recurses && right_recurses && left.len() == right.len() {
            (left.into_cells().into_iter())
                .zip(right.into_cells())
                .map(|(l, r)| self.call_at(f, Some(l), r, ldepth - 1, rdepth - 1))
                .collect()
        } else if left_recurses {
            (left.into_cells().into_iter())
                .map(|l| self.call_at(f, Some(l), right.clone(), ldepth - 1, rdepth))
                .collect()
        } else if right_recurses {
            (right.into_cells().into_iter())
                .map(|r| self.call_at(f, Some(left.clone()), r, ldepth, rdepth - 1))
                .collect()
        } else {
            let pad = self.pad_of(f)?;
            self.invoke(f, Some(pad_to(left, pad.left)), pad_to(right, pad.right))
        }
    }
    /// Run a function's body on already conformed arguments
    fn invoke(&mut self, f: &Function, left: Option<Value>, right: Value) -> JoeResult<Value> {
        match f {
            Function::Primitive(prim) => {
                trace!(%prim, left = ?left, %right, "invoke");
                run_prim(*prim, right, left)
            }
            Function::Bound(name) => {
                let f = self.resolve(name)?;
                self.invoke(&f, left, right)
            }
            Function::Fixed { left: fixed, f } => self.call(f, Some(fixed.clone()), right),
            Function::Adverbed { adverb, f } => self.run_adverb(*adverb, f, left, right),
            Function::Conjoined {
                conj,
                left: a,
                right: b,
            } => self.run_conjunction(*conj, a, b, left, right),
            Function::Agenda(_) => Err(JoeError::type_error(format!(
                "The agenda {f} must be dispatched with @ before it is called"
            ))),
            Function::Composed(fs) => {
                let mut right = right;
                for g in fs.iter().rev() {
                    right = self.call(g, left.clone(), right)?;
                }
                Ok(right)
            }
            Function::Train(fs) => self.run_train(fs, left, right),
        }
    }
    /// Get the rank of a function
    pub fn rank_of(&self, f: &Function) -> JoeResult<RankSpec> {
        let mut f = f.clone();
        for _ in 0..self.config.recursion_limit {
            f = match f {
                Function::Primitive(prim) => return Ok(prim.rank()),
                Function::Bound(name) => self.resolve(&name)?,
                Function::Fixed { f, .. } => (*f).clone(),
                Function::Adverbed { adverb, f } => match adverb {
                    Adverb::Fold => return Ok(RankSpec::new(INFINITE_RANK, INFINITE_RANK, -1)),
                    Adverb::Map => return Ok(RankSpec::uniform(-1)),
                    Adverb::Windows => return Ok(RankSpec::pair(0, INFINITE_RANK)),
                    Adverb::Selfie => (*f).clone(),
                },
                Function::Conjoined { conj, left, right } => match conj {
                    Conjunction::Rank => return rank_from_value(&left),
                    Conjunction::SeedFold => {
                        return Ok(RankSpec::new(INFINITE_RANK, INFINITE_RANK, -1))
                    }
                    Conjunction::Compose if self.agenda_of(&left)?.is_none() => {
                        return Ok(RankSpec::INFINITE)
                    }
                    Conjunction::Compose | Conjunction::ComposeRank => {
                        operand_function(&right, conj)?.clone()
                    }
                    _ => return Ok(RankSpec::INFINITE),
                },
                Function::Agenda(_) | Function::Composed(_) | Function::Train(_) => {
                    return Ok(RankSpec::INFINITE)
                }
            };
        }
        Err(JoeError::RecursionLimit(self.config.recursion_limit))
    }
    /// Get the pad depths of a function
    pub fn pad_of(&self, f: &Function) -> JoeResult<PadSpec> {
        Ok(match f {
            Function::Primitive(prim) => prim.pad(),
            Function::Bound(name) => match self.resolve(name)? {
                Function::Bound(_) => PadSpec::NONE,
                f => self.pad_of(&f)?,
            },
            Function::Adverbed {
                adverb: Adverb::Fold | Adverb::Windows,
                ..
            }
            | Function::Conjoined {
                conj: Conjunction::SeedFold,
                ..
            } => PadSpec::new(1, 0, 1),
            _ => PadSpec::NONE,
        })
    }
    /// The functions of an agenda operand, if it is one
    pub(crate) fn agenda_of(&self, operand: &Operand) -> JoeResult<Option<ecow::EcoVec<Function>>> {
        Ok(match operand {
            Operand::Function(Function::Agenda(fs)) => Some(fs.clone()),
            Operand::Function(Function::Bound(name)) => match self.resolve(name)? {
                Function::Agenda(fs) => Some(fs),
                _ => None,
            },
            _ => None,
        })
    }
}

/// Get the function operand of a conjunction
pub(crate) fn operand_function(operand: &Operand, conj: Conjunction) -> JoeResult<&Function> {
    operand.as_function().ok_or_else(|| {
        JoeError::type_error(format!("{conj} expects a function operand, not a value"))
    })
}

/// Build a rank from a value of one, two, or three integers
pub fn rank_from_value(operand: &Operand) -> JoeResult<RankSpec> {
    let value = operand
        .as_value()
        .ok_or_else(|| JoeError::type_error("A rank must be a value"))?;
    let ranks: Vec<i32> = as_ints(value, "Rank")?
        .into_iter()
        .map(|r| r.clamp(-(INFINITE_RANK as i64), INFINITE_RANK as i64) as i32)
        .collect();
    RankSpec::from_slice(&ranks).ok_or_else(|| {
        JoeError::shape(format!(
            "A rank must have 1, 2, or 3 components, but {value} has {}",
            ranks.len()
        ))
    })
}

/// Whether a rank calls for recursing into a value
fn recurses(rank: i32, value: &Value, counter: i32) -> bool {
    value.is_seq()
        && if rank < 0 {
            counter > rank
        } else {
            rank < INFINITE_RANK && value.depth() > rank as usize
        }
}

/// Wrap a value in sequences until it is at least `depth` deep
///
/// Character scalars are left alone.
fn pad_to(mut value: Value, depth: u8) -> Value {
    if let Value::Char(_) = value {
        return value;
    }
    while value.depth() < depth as usize {
        value = value.wrap();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Primitive;

    fn nums(ns: &[f64]) -> Value {
        ns.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn rank_zero_maps_over_any_depth() {
        let mut joe = Joe::without_prelude(Config::default());
        let nested = Value::from_iter([nums(&[1.0, -2.0]), Value::from_iter([nums(&[3.0])])]);
        let negated = joe
            .call(&Primitive::Sub.into(), None, nested)
            .unwrap();
        assert_eq!(negated.to_string(), "[[-1,2],[[-3]]]");
    }

    #[test]
    fn unequal_lengths_recurse_left_first() {
        let mut joe = Joe::without_prelude(Config::default());
        let sum = joe
            .call(
                &Primitive::Add.into(),
                Some(nums(&[10.0, 20.0])),
                nums(&[1.0, 2.0, 3.0]),
            )
            .unwrap();
        assert_eq!(sum.to_string(), "[[11,12,13],[21,22,23]]");
        let zipped = joe
            .call(&Primitive::Add.into(), Some(nums(&[10.0, 20.0])), nums(&[1.0, 2.0]))
            .unwrap();
        assert_eq!(zipped, nums(&[11.0, 22.0]));
    }

    #[test]
    fn padding_wraps_scalars_but_not_characters() {
        assert_eq!(pad_to(1.0.into(), 2).to_string(), "[[1]]");
        assert_eq!(pad_to('a'.into(), 1), Value::from('a'));
        assert_eq!(pad_to(nums(&[1.0]), 1), nums(&[1.0]));
    }

    #[test]
    fn negative_rank_recurses_by_levels() {
        let mut joe = Joe::without_prelude(Config::default());
        let deep = Value::from_iter([nums(&[1.0, 2.0]), nums(&[3.0])]);
        let mapped_len = Function::adverbed(Adverb::Map, Primitive::Len.into());
        assert_eq!(joe.call(&mapped_len, None, deep).unwrap(), nums(&[2.0, 1.0]));
    }

    #[test]
    fn ranks_of_combinators() {
        let joe = Joe::without_prelude(Config::default());
        let fold = Function::adverbed(Adverb::Fold, Primitive::Add.into());
        assert_eq!(joe.rank_of(&fold).unwrap(), RankSpec::new(100, 100, -1));
        let ranked = Function::conjoined(
            Conjunction::Rank,
            nums(&[1.0, 2.0]),
            Function::Primitive(Primitive::Join),
        );
        assert_eq!(joe.rank_of(&ranked).unwrap(), RankSpec::new(2, 1, 2));
        let selfie = Function::adverbed(Adverb::Selfie, Primitive::Last.into());
        assert_eq!(joe.rank_of(&selfie).unwrap(), Primitive::Last.rank());
        let unbound = Function::Bound("Nope".into());
        assert!(matches!(joe.rank_of(&unbound), Err(JoeError::Name(_))));
    }

    #[test]
    fn rebinding_a_function_as_a_value_forgets_its_calls() {
        let mut joe = Joe::without_prelude(Config::default().with_memo(MemoStrategy::Named));
        joe.bind_function("Double", Function::fixed(2.0.into(), Primitive::Mul.into()));
        let double = Function::Bound("Double".into());
        assert_eq!(joe.call(&double, None, 3.0.into()).unwrap(), Value::from(6.0));
        assert!(joe.memo_stats().len > 0);
        joe.bind_variable("Other", 1.0.into());
        assert!(joe.memo_stats().len > 0);
        joe.bind_variable("Double", 1.0.into());
        assert_eq!(joe.memo_stats().len, 0);
        assert!(matches!(
            joe.call(&double, None, 3.0.into()),
            Err(JoeError::Name(_))
        ));
    }

    #[test]
    fn recursion_limit_is_reported() {
        let mut joe = Joe::without_prelude(Config::default().with_recursion_limit(16));
        joe.bind_function(
            "Loop",
            Function::adverbed(Adverb::Selfie, Function::Bound("Loop".into())),
        );
        let err = joe.call(&Function::Bound("Loop".into()), None, 1.0.into()).unwrap_err();
        assert!(matches!(err, JoeError::RecursionLimit(16)), "{err}");
    }
}
