//! A fixed set of programs with known output

use colored::*;
use tracing::info;

use crate::{Config, Joe};

/// Programs and the output of their last statement
pub const REGRESSIONS: &[(&str, &str)] = &[
    ("{/+%N)1 2 3 4", "2.5"),
    ("(/*-,1R)5", "120"),
    ("(2Lr0 1/,;$:/+@2ER)10", "[0,1,1,2,3,5,8,13,21,34]"),
    ("(VOeM;$C$,-:)\"dsaasafd\"", "[['a',3],['s',2],['d',2],['f',1]]"),
    ("M-,~/!R5", "[[1],[1,1],[1,2,1],[1,3,3,1],[1,4,6,4,1]]"),
    ("Fac:(*$(Fac@<:))`(1B)@(1>:)\nFac 6", "720"),
    ("Mean 1 2 3 4 5 6", "3.5"),
    ("X:3\n2*X+1", "8"),
    ("2 3T R6", "[[0,1],[2,3],[4,5]]"),
    ("T 2 3", "[[0,1],[2,3],[4,5]]"),
    ("T 2 2", "[[0,1],[2,3]]"),
    ("O 3 1 2", "[1,2,3]"),
    ("-: 3 1 3 2 1", "[3,1,2]"),
    ("2I 1 0 1", "5"),
    ("2Id 6", "[1,1,0]"),
    ("' S\"ab cd\"", "[['a','b'],['c','d']]"),
    ("\"--\"J\"ab\" \"cd\"", "ab--cd"),
    ("3\\A R5", "[[0,1,2],[1,2,3],[2,3,4]]"),
    ("D[[1]]", "2"),
    ("2#1 2", "[1,2,1,2]"),
    ("_1N\"xyz\"", "'z'"),
];

/// Run the regression set, returning the number of failures
pub fn run_regressions(config: &Config) -> usize {
    let mut failures = 0;
    for (i, (program, expected)) in REGRESSIONS.iter().enumerate() {
        let mut joe = Joe::with_config(config.clone());
        let actual = match joe.load_str(program) {
            Ok(Some(result)) => result.to_string(),
            Ok(None) => String::new(),
            Err(e) => e.report(program),
        };
        let program = program.replace('\n', " ⏎ ");
        if actual == *expected {
            info!(case = i, "pass");
            println!("{} {program}", "✓".green());
        } else {
            failures += 1;
            println!(
                "{} {program}\n    expected {}\n    but got  {}",
                "✗".red(),
                expected.bright_white(),
                actual.bright_white()
            );
        }
    }
    let passed = REGRESSIONS.len() - failures;
    if failures == 0 {
        println!("{}", format!("All {passed} tests passed").green().bold());
    } else {
        println!(
            "{}",
            format!("{passed} passed, {failures} failed").red().bold()
        );
    }
    failures
}
