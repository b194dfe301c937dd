use std::fs;

use joe::{Config, GridFmt, Joe, JoeError, MemoStrategy, Operand, Value, REGRESSIONS};

fn eval(joe: &mut Joe, code: &str) -> String {
    match joe.load_str(code) {
        Ok(result) => result.map(|r| r.to_string()).unwrap_or_default(),
        Err(e) => panic!("{code:?} failed: {e}"),
    }
}

fn check(code: &str, expected: &str) {
    assert_eq!(eval(&mut Joe::new(), code), expected, "{code:?}");
}

#[test]
fn mean() {
    check("{/+%N)1 2 3 4", "2.5");
    check("Mean 1 2 3 4 5 6", "3.5");
}

#[test]
fn factorial() {
    check("(/*-,1R)5", "120");
    check("Fac:(*$(Fac@<:))`(1B)@(1>:)\nFac 6", "720");
}

#[test]
fn fibonacci() {
    check("(2Lr0 1/,;$:/+@2ER)10", "[0,1,1,2,3,5,8,13,21,34]");
}

#[test]
fn character_frequencies() {
    check(
        "(VOeM;$C$,-:)\"dsaasafd\"",
        "[['a',3],['s',2],['d',2],['f',1]]",
    );
}

#[test]
fn pascals_triangle() {
    check("M-,~/!R5", "[[1],[1,1],[1,2,1],[1,3,3,1],[1,4,6,4,1]]");
}

#[test]
fn bindings_persist_between_loads() {
    let mut joe = Joe::new();
    eval(&mut joe, "Double:(2*)");
    eval(&mut joe, "X:Double 1 2 3");
    assert_eq!(eval(&mut joe, "X"), "[2,4,6]");
    assert_eq!(eval(&mut joe, "/+X"), "12");
    assert!(joe.env().functions().any(|(name, _)| name == "Double"));
    assert!(joe.env().variables().any(|(name, _)| name == "X"));
}

#[test]
fn run_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scale.joe");
    fs::write(&path, "Double:(2*)\nX:Double 1 2 3\n/+X\n").unwrap();
    let mut joe = Joe::new();
    let result = joe.load_file(&path).unwrap().unwrap();
    assert_eq!(result.to_string(), "12");

    let missing = dir.path().join("missing.joe");
    assert!(matches!(joe.load_file(missing), Err(JoeError::Load(..))));
}

#[test]
fn error_kinds() {
    let mut joe = Joe::new();
    let kind = |joe: &mut Joe, code: &str| match joe.load_str(code) {
        Ok(result) => panic!("{code:?} succeeded with {result:?}"),
        Err(e) => e.kind(),
    };
    assert_eq!(kind(&mut joe, "1 2 )"), "ParseError");
    assert_eq!(kind(&mut joe, "()"), "ParseError");
    assert_eq!(kind(&mut joe, "Nope 1"), "NameError");
    assert_eq!(kind(&mut joe, "(-`V)5"), "TypeError");
    assert_eq!(kind(&mut joe, "0\\A 1 2 3"), "ShapeError");
    assert_eq!(kind(&mut joe, "\"abc"), "LexError");

    let mut joe = Joe::with_config(Config::default().with_recursion_limit(64));
    eval(&mut joe, "Loop:(1+Loop)");
    assert!(matches!(
        joe.load_str("Loop 1"),
        Err(JoeError::RecursionLimit(64))
    ));
    // The session survives the error
    assert_eq!(eval(&mut joe, "1+2"), "3");
}

#[test]
fn memo_strategies_agree() {
    let programs = [
        "Fac:(*$(Fac@<:))`(1B)@(1>:)\nFac 10",
        "(2Lr0 1/,;$:/+@2ER)12",
        "M-,~/!R6",
    ];
    for program in programs {
        let expected = eval(&mut Joe::new(), program);
        for memo in [MemoStrategy::Named, MemoStrategy::All] {
            let mut joe = Joe::with_config(Config::default().with_memo(memo));
            assert_eq!(eval(&mut joe, program), expected, "{program:?} with {memo}");
        }
    }
}

#[test]
fn named_memo_reuses_results() {
    let mut joe = Joe::with_config(Config::default().with_memo(MemoStrategy::Named));
    eval(&mut joe, "Fac:(*$(Fac@<:))`(1B)@(1>:)");
    assert_eq!(eval(&mut joe, "Fac 8"), "40320");
    let before = joe.memo_stats();
    assert_eq!(eval(&mut joe, "Fac 8"), "40320");
    assert!(joe.memo_stats().hits > before.hits);

    // Rebinding clears the cache
    eval(&mut joe, "Fac:(1+)");
    assert_eq!(joe.memo_stats().len, 0);
    assert_eq!(eval(&mut joe, "Fac 8"), "9");
}

#[test]
fn results_can_be_functions() {
    let mut joe = Joe::new();
    assert!(matches!(
        joe.load_str("-,").unwrap(),
        Some(Operand::Function(_))
    ));
    assert!(joe.load_str("").unwrap().is_none());
}

#[test]
fn table_output() {
    let mut joe = Joe::new();
    let Some(Operand::Value(value)) = joe.load_str("2 3T R6").unwrap() else {
        panic!("expected a value");
    };
    assert_eq!(value.grid_string(), "0 1\n2 3\n4 5\n");
    assert_eq!(Value::from("hi").grid_string(), "hi\n");
}

#[test]
fn printing_and_nesting() {
    check("P\"hi\"", "0");
    check("\"{} and {}\"P 1 2", "0");
    check("Lt 1 2", "[[[1,2]]]");
    check("D Lt 1", "2");
}

#[test]
fn huge_counts_are_errors() {
    let mut joe = Joe::new();
    for code in ["_10000000000000000000E 1 2", "10000000000000000000#1 2", "9000000000000000000#1 2"] {
        assert!(
            matches!(joe.load_str(code), Err(JoeError::Shape(_))),
            "{code:?}"
        );
    }
}

#[test]
fn regression_set_passes() {
    assert!(REGRESSIONS.len() >= 5);
    for (program, expected) in REGRESSIONS {
        check(program, expected);
    }
}
