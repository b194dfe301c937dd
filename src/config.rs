use std::{fmt, str::FromStr};

/// Which function calls are memoized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MemoStrategy {
    /// Nothing is cached
    #[default]
    Off,
    /// Calls to user-bound functions are cached
    Named,
    /// Every non-primitive call is cached
    All,
}

impl FromStr for MemoStrategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(MemoStrategy::Off),
            "named" => Ok(MemoStrategy::Named),
            "all" => Ok(MemoStrategy::All),
            _ => Err(format!(
                "Unknown memo strategy {s:?}, expected one of off, named, or all"
            )),
        }
    }
}

impl fmt::Display for MemoStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoStrategy::Off => write!(f, "off"),
            MemoStrategy::Named => write!(f, "named"),
            MemoStrategy::All => write!(f, "all"),
        }
    }
}

/// Interpreter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Print results as tables
    pub table: bool,
    /// Emit diagnostic tracing
    pub debug: bool,
    /// Which calls are memoized
    pub memo: MemoStrategy,
    /// The most results the memo cache holds before evicting
    pub memo_capacity: usize,
    /// The deepest the call engine and reducer may nest
    pub recursion_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table: false,
            debug: false,
            memo: MemoStrategy::Off,
            memo_capacity: 1024,
            recursion_limit: 384,
        }
    }
}

impl Config {
    pub fn with_table(mut self, table: bool) -> Self {
        self.table = table;
        self
    }
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
    pub fn with_memo(mut self, memo: MemoStrategy) -> Self {
        self.memo = memo;
        self
    }
    pub fn with_memo_capacity(mut self, capacity: usize) -> Self {
        self.memo_capacity = capacity;
        self
    }
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memo_strategy_from_str() {
        assert_eq!("Named".parse(), Ok(MemoStrategy::Named));
        assert_eq!("all".parse(), Ok(MemoStrategy::All));
        assert_eq!("off".parse(), Ok(MemoStrategy::Off));
        assert!("sometimes".parse::<MemoStrategy>().is_err());
        for strategy in [MemoStrategy::Off, MemoStrategy::Named, MemoStrategy::All] {
            assert_eq!(strategy.to_string().parse(), Ok(strategy));
        }
    }
}
