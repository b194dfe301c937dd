//! The stack reducer
//!
//! Statements are read from their right edge. Each classified token becomes a
//! cell that is checked against the top of the stack, and the first matching
//! reduction pops its operands and pushes its result.

use ecow::EcoVec;
use tracing::debug;

use crate::{
    lex, Adverb, CodeSpan, Conjunction, Delim, Function, Ident, Joe, JoeError, JoeResult, Lexeme,
    OperandKind, Operand, Sp, Tokenizer, Value,
};

#[derive(Debug, Clone)]
enum Cell {
    Value(Value),
    /// Values juxtaposed into a list, still open for more on the left
    List(EcoVec<Value>),
    Function(Function),
    Adverb(Adverb),
    Conjunction(Conjunction),
    Assign,
}

impl Cell {
    fn is_value(&self) -> bool {
        matches!(self, Cell::Value(_) | Cell::List(_))
    }
    fn is_function(&self) -> bool {
        matches!(self, Cell::Function(_))
    }
    fn into_operand(self) -> Option<Operand> {
        match self {
            Cell::Value(value) => Some(Operand::Value(value)),
            Cell::List(values) => Some(Operand::Value(values.into())),
            Cell::Function(f) => Some(Operand::Function(f)),
            _ => None,
        }
    }
    fn describe(&self) -> String {
        match self {
            Cell::Value(value) => format!("value {value}"),
            Cell::List(values) => format!("value {}", Value::from(values.clone())),
            Cell::Function(f) => format!("function {f}"),
            Cell::Adverb(adverb) => format!("adverb {adverb}"),
            Cell::Conjunction(conj) => format!("conjunction {conj}"),
            Cell::Assign => "assignment".into(),
        }
    }
}

/// How leftover cells are combined at the end of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Exactly one cell may remain
    Ordinary,
    /// Leftover functions are composed
    Tacit,
    /// Leftover functions form a fork train
    Train,
}

type Stack = Vec<Sp<Cell>>;

impl Joe {
    /// Run Joe source code, returning the result of its last statement
    pub fn load_str(&mut self, input: &str) -> JoeResult<Option<Operand>> {
        let tokens = lex(input)?;
        let mut result = None;
        for statement in Tokenizer::statements(&tokens) {
            self.depth = 0;
            let cell = self.reduce(statement, Mode::Ordinary)?;
            result = cell.value.into_operand();
        }
        Ok(result)
    }
    fn reduce(&mut self, mut tokens: Tokenizer, mode: Mode) -> JoeResult<Sp<Cell>> {
        let whole = tokens.span().unwrap_or_default();
        let mut stack = Stack::new();
        while let Some(lexeme) = tokens.next_back(&self.env) {
            let span = lexeme.span;
            let cell = match lexeme.value {
                Lexeme::Number(n) => Cell::Value(n.into()),
                Lexeme::Str(s) => Cell::Value(s.as_str().into()),
                Lexeme::Char(c) => Cell::Value(c.into()),
                Lexeme::Primitive(prim) => Cell::Function(prim.into()),
                Lexeme::Adverb(adverb) => Cell::Adverb(adverb),
                Lexeme::Conjunction(conj) => Cell::Conjunction(conj),
                Lexeme::Function(name) | Lexeme::Variable(name) | Lexeme::Name(name)
                    if matches!(stack.last(), Some(Sp { value: Cell::Assign, .. })) =>
                {
                    self.assign(name, &mut stack)?
                }
                Lexeme::Variable(name) => match self.env.variable(&name) {
                    Some(value) => Cell::Value(value.clone()),
                    None => return Err(JoeError::Name(name)),
                },
                Lexeme::Function(name) | Lexeme::Name(name) => {
                    Cell::Function(Function::Bound(name))
                }
                Lexeme::Assign => {
                    let rhs = self.collapse(std::mem::take(&mut stack), span)?;
                    stack.push(rhs);
                    stack.push(span.sp(Cell::Assign));
                    continue;
                }
                Lexeme::Open(delim) => {
                    return Err(JoeError::parse(
                        span,
                        format!("Unmatched {}", delim.open_char()),
                    ))
                }
                Lexeme::Close(close) => {
                    let Some((open, inner)) = tokens.take_group(close) else {
                        return Err(JoeError::parse(
                            span,
                            format!("Unmatched {}", close.close_char()),
                        ));
                    };
                    let span = inner.span().map_or(span, |inner| inner.merge(span));
                    self.nested(|joe| joe.group(open, inner, span))?
                }
            };
            self.shift(&mut stack, span.sp(cell))?;
        }
        self.finish(stack, mode, whole)
    }
    /// Reduce the contents of a delimited group
    fn group(&mut self, open: Delim, inner: Tokenizer, span: CodeSpan) -> JoeResult<Cell> {
        if inner.is_empty() {
            return match open {
                Delim::Bracket => Ok(Cell::Value(Value::empty())),
                _ => Err(JoeError::parse(span, "Empty group")),
            };
        }
        let cell = match open {
            Delim::Bracket => match self.reduce(inner, Mode::Ordinary)?.value {
                Cell::Value(value) => Cell::Value(value.wrap()),
                cell => {
                    return Err(JoeError::parse(
                        span,
                        format!("Brackets must hold a value, not a {}", cell.describe()),
                    ))
                }
            },
            Delim::Paren if inner.is_value(&self.env) => {
                self.reduce(inner, Mode::Ordinary)?.value
            }
            Delim::Paren => self.reduce(inner, Mode::Tacit)?.value,
            Delim::Brace => self.reduce(inner, Mode::Train)?.value,
        };
        Ok(cell)
    }
    /// Bind the name in front of an assignment
    fn assign(&mut self, name: Ident, stack: &mut Stack) -> JoeResult<Cell> {
        stack.pop();
        let Some(rhs) = stack.pop() else {
            return Err(JoeError::parse(CodeSpan::default(), "Nothing to assign"));
        };
        Ok(match rhs.value {
            Cell::Value(value) => {
                debug!(%name, %value, "bind variable");
                self.bind_variable(name, value.clone());
                Cell::Value(value)
            }
            Cell::Function(f) => {
                let f = match f {
                    Function::Bound(other) => self.resolve(&other)?,
                    f => f,
                };
                debug!(%name, %f, "bind function");
                self.bind_function(name, f.clone());
                Cell::Function(f)
            }
            cell => {
                return Err(JoeError::parse(
                    rhs.span,
                    format!("Cannot assign a {}", cell.describe()),
                ))
            }
        })
    }
    /// Push a cell, reducing against the stack first
    fn shift(&mut self, stack: &mut Stack, cell: Sp<Cell>) -> JoeResult {
        self.reduce_all(stack, Some(&cell.value))?;
        let span = cell.span;
        match (cell.value, stack.pop()) {
            (Cell::Adverb(adverb), Some(Sp { value: Cell::Function(f), span: f_span })) => {
                let f = Function::adverbed(adverb, f);
                debug!(%f, "reduce adverb");
                stack.push(span.merge(f_span).sp(Cell::Function(f)));
            }
            (Cell::Value(value), Some(Sp { value: Cell::Value(next), span: next_span })) => {
                let list = EcoVec::from([value, next]);
                stack.push(span.merge(next_span).sp(Cell::List(list)));
            }
            (Cell::Value(value), Some(Sp { value: Cell::List(mut values), span: list_span })) => {
                values.insert(0, value);
                stack.push(span.merge(list_span).sp(Cell::List(values)));
            }
            (value, top) => {
                stack.extend(top);
                stack.push(span.sp(value));
            }
        }
        Ok(())
    }
    /// Apply reductions until none match
    fn reduce_all(&mut self, stack: &mut Stack, ctx: Option<&Cell>) -> JoeResult {
        while self.reduce_once(stack, ctx)? {}
        Ok(())
    }
    fn reduce_once(&mut self, stack: &mut Stack, ctx: Option<&Cell>) -> JoeResult<bool> {
        let ctx_value = ctx.is_some_and(Cell::is_value);
        let ctx_modifier = matches!(ctx, Some(Cell::Adverb(_) | Cell::Conjunction(_)));
        let n = stack.len();
        let top = |i: usize| n.checked_sub(i).map(|j| &stack[j].value);
        let (t1, t2, t3) = (top(1), top(2), top(3));
        let is_value = |cell: Option<&Cell>| cell.is_some_and(Cell::is_value);
        let is_function = |cell: Option<&Cell>| cell.is_some_and(Cell::is_function);

        // Dyadic application
        if !ctx_value && !ctx_modifier && is_value(t1) && is_function(t2) && is_value(t3) {
            let (left, f, right) = (pop(stack)?, pop(stack)?, pop(stack)?);
            let span = left.span.merge(right.span);
            let f = into_function(f)?;
            debug!(%f, "reduce dyadic");
            let value = self.call(&f, Some(into_value(left)?), into_value(right)?)?;
            stack.push(span.sp(Cell::Value(value)));
            return Ok(true);
        }
        // Partial application
        if !ctx_value && is_value(t1) && is_function(t2) && !is_value(t3) {
            let (left, f) = (pop(stack)?, pop(stack)?);
            let span = left.span.merge(f.span);
            let f = Function::fixed(into_value(left)?, into_function(f)?);
            debug!(%f, "reduce partial");
            stack.push(span.sp(Cell::Function(f)));
            return Ok(true);
        }
        // Monadic application
        if !ctx_value && !ctx_modifier && is_function(t1) && is_value(t2) {
            let (f, right) = (pop(stack)?, pop(stack)?);
            let span = f.span.merge(right.span);
            let f = into_function(f)?;
            debug!(%f, "reduce monadic");
            let value = self.call(&f, None, into_value(right)?)?;
            stack.push(span.sp(Cell::Value(value)));
            return Ok(true);
        }
        // Conjunction
        if let (Some(x), Some(Cell::Conjunction(conj)), Some(y)) = (t1, t2, t3) {
            let conj = *conj;
            let blocked = ctx_value
                || match ctx {
                    Some(Cell::Adverb(_)) => true,
                    Some(Cell::Conjunction(next)) => next.precedence() >= conj.precedence(),
                    _ => false,
                };
            if !blocked && (x.is_value() || x.is_function()) && (y.is_value() || y.is_function()) {
                let (x, c, y) = (pop(stack)?, pop(stack)?, pop(stack)?);
                let span = x.span.merge(y.span);
                let f = conjoin(conj, x, y, c.span)?;
                debug!(%f, "reduce conjunction");
                stack.push(span.sp(Cell::Function(f)));
                return Ok(true);
            }
        }
        Ok(false)
    }
    /// Reduce a finished level down to one cell
    fn finish(&mut self, mut stack: Stack, mode: Mode, span: CodeSpan) -> JoeResult<Sp<Cell>> {
        self.reduce_all(&mut stack, None)?;
        let dangling = (stack.iter()).find(|cell| !cell.value.is_value() && !cell.value.is_function());
        if let Some(dangling) = dangling {
            return Err(JoeError::parse(
                dangling.span,
                format!("Dangling {}", dangling.value.describe()),
            ));
        }
        match mode {
            _ if stack.len() <= 1 => (stack.pop().map(list_to_value))
                .ok_or_else(|| JoeError::parse(span, "Expected an expression")),
            Mode::Ordinary => {
                let found: Vec<String> = (stack.iter().rev())
                    .map(|cell| cell.value.describe())
                    .collect();
                Err(JoeError::parse(
                    span,
                    format!("Expected one expression, but found {}", found.join(", ")),
                ))
            }
            Mode::Tacit | Mode::Train => {
                let fs = functions_of(stack)?;
                debug!(len = fs.len(), ?mode, "reduce tines");
                let f = if mode == Mode::Train {
                    Function::Train(fs)
                } else {
                    Function::Composed(fs)
                };
                Ok(span.sp(Cell::Function(f)))
            }
        }
    }
    /// Collapse everything right of an assignment into one cell
    fn collapse(&mut self, mut stack: Stack, span: CodeSpan) -> JoeResult<Sp<Cell>> {
        self.reduce_all(&mut stack, None)?;
        if stack.len() > 1 && stack.iter().all(|cell| cell.value.is_function()) {
            let fs = functions_of(stack)?;
            return Ok(span.sp(Cell::Function(Function::Composed(fs))));
        }
        self.finish(stack, Mode::Ordinary, span)
    }
}

fn pop(stack: &mut Stack) -> JoeResult<Sp<Cell>> {
    stack
        .pop()
        .ok_or_else(|| JoeError::parse(CodeSpan::default(), "Unexpected end of expression"))
}

fn list_to_value(cell: Sp<Cell>) -> Sp<Cell> {
    cell.map(|cell| match cell {
        Cell::List(values) => Cell::Value(values.into()),
        cell => cell,
    })
}

fn into_value(cell: Sp<Cell>) -> JoeResult<Value> {
    match cell.value {
        Cell::Value(value) => Ok(value),
        Cell::List(values) => Ok(values.into()),
        other => Err(JoeError::parse(
            cell.span,
            format!("Expected a value, but found a {}", other.describe()),
        )),
    }
}

fn into_function(cell: Sp<Cell>) -> JoeResult<Function> {
    match cell.value {
        Cell::Function(f) => Ok(f),
        other => Err(JoeError::parse(
            cell.span,
            format!("Expected a function, but found a {}", other.describe()),
        )),
    }
}

/// The functions of a level, left to right
fn functions_of(stack: Stack) -> JoeResult<EcoVec<Function>> {
    stack.into_iter().rev().map(into_function).collect()
}

/// Build the function a conjunction makes of its operands
fn conjoin(conj: Conjunction, x: Sp<Cell>, y: Sp<Cell>, span: CodeSpan) -> JoeResult<Function> {
    let (x_span, y_span) = (x.span, y.span);
    let (Some(x), Some(y)) = (x.value.into_operand(), y.value.into_operand()) else {
        return Err(JoeError::parse(span, format!("Missing operand for {conj}")));
    };
    let Operand::Function(y) = y else {
        return Err(JoeError::parse(
            y_span,
            format!("{conj} expects a function on its right"),
        ));
    };
    match (conj.left_operand(), &x) {
        (OperandKind::Value, Operand::Value(_))
        | (OperandKind::Function | OperandKind::FunctionOrAgenda, Operand::Function(_)) => {}
        (OperandKind::Value, _) => {
            return Err(JoeError::parse(x_span, format!("{conj} expects a value on its left")))
        }
        _ => {
            return Err(JoeError::parse(
                x_span,
                format!("{conj} expects a function on its left"),
            ))
        }
    }
    Ok(match (conj, x) {
        (Conjunction::Agenda, Operand::Function(x)) => {
            let mut fs = agenda_cells(x);
            fs.extend(agenda_cells(y));
            Function::Agenda(fs)
        }
        (conj, x) => Function::conjoined(conj, x, y),
    })
}

fn agenda_cells(f: Function) -> EcoVec<Function> {
    match f {
        Function::Agenda(fs) => fs,
        f => EcoVec::from([f]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn run(src: &str) -> String {
        let mut joe = Joe::new();
        match joe.load_str(src) {
            Ok(Some(result)) => result.to_string(),
            Ok(None) => String::new(),
            Err(e) => panic!("{src:?} failed: {e}"),
        }
    }

    fn fails(src: &str) -> JoeError {
        let mut joe = Joe::without_prelude(Config::default());
        match joe.load_str(src) {
            Ok(result) => panic!("{src:?} succeeded with {result:?}"),
            Err(e) => e,
        }
    }

    #[test]
    fn juxtaposition_builds_lists() {
        assert_eq!(run("1 2 3"), "[1,2,3]");
        assert_eq!(run("1 2+10"), "[11,12]");
        assert_eq!(run("(1 2) 3"), "[[1,2],3]");
        assert_eq!(run("[1 2]"), "[[1,2]]");
        assert_eq!(run("[]"), "[]");
        assert_eq!(run("10-2"), "8");
        assert_eq!(run("-2"), "-2");
    }

    #[test]
    fn application_order() {
        assert_eq!(run("2*3+4"), "14");
        assert_eq!(run("2E 1 2 3"), "[2,3]");
        assert_eq!(run("/+R5"), "10");
        assert_eq!(run("2E"), "2E");
    }

    #[test]
    fn conjunction_precedence() {
        // @ binds tighter than $:, which binds tighter than /,
        assert_eq!(run("(2Lr0 1/,;$:/+@2ER)10"), "[0,1,1,2,3,5,8,13,21,34]");
        assert_eq!(run("/+@(2E)"), "/+@(2E)");
    }

    #[test]
    fn explicit_rank_changes_recursion() {
        assert_eq!(run("L(1 2) (3 4 5)"), "2");
        assert_eq!(run("(1^L)(1 2) (3 4 5)"), "[2,3]");
        assert_eq!(run(";(1 2) (3 4 5)"), "[1,2,3,4,5]");
        assert_eq!(run("(1^;)(1 2) (3 4 5)"), "[[1,2],[3,4,5]]");
        assert_eq!(run("(0^L)(1 2) (3 4 5)"), "[[1,1],[1,1,1]]");
    }

    #[test]
    fn assignment() {
        let mut joe = Joe::new();
        joe.load_str("X:1 2 3").unwrap();
        assert_eq!(joe.env().variable("X").map(Value::to_string), Some("[1,2,3]".into()));
        let result = joe.load_str("Sum:/+\nSum X").unwrap();
        assert_eq!(result.map(|r| r.to_string()), Some("6".into()));
        // Bare names are bound to what they refer to now
        joe.load_str("Total:Sum").unwrap();
        assert_eq!(joe.env().function("Total").map(Function::to_string), Some("/+".into()));
        // Assignment yields the assigned value
        assert_eq!(joe.load_str("1+Y:2").unwrap().map(|r| r.to_string()), Some("3".into()));
        // Several functions right of an assignment are composed
        joe.load_str("Neg:- V").unwrap();
        assert_eq!(joe.load_str("Neg 1 2").unwrap().map(|r| r.to_string()), Some("[-2,-1]".into()));
    }

    #[test]
    fn recursive_definitions() {
        let mut joe = Joe::new();
        joe.load_str("Fac:(*$(Fac@<:))`(1B)@(1>:)").unwrap();
        let result = joe.load_str("Fac 5").unwrap();
        assert_eq!(result.map(|r| r.to_string()), Some("120".into()));
    }

    #[test]
    fn trains_and_tacit_groups() {
        assert_eq!(run("{/+%N)1 2 3 4"), "2.5");
        assert_eq!(run("Mean 2 4"), "3");
        assert_eq!(run("(V \\/+) 1 2 3"), "[6,3,1]");
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(fails("(1"), JoeError::Parse(_)));
        assert!(matches!(fails("1)"), JoeError::Parse(_)));
        assert!(matches!(fails("{1]"), JoeError::Parse(_)));
        assert!(matches!(fails("()"), JoeError::Parse(_)));
        assert!(matches!(fails("/"), JoeError::Parse(_)));
        assert!(matches!(fails("+ -"), JoeError::Parse(_)));
        assert!(matches!(fails("2^1"), JoeError::Parse(_)));
        assert!(matches!(fails("\"abc"), JoeError::Lex(_)));
    }

    #[test]
    fn name_errors() {
        assert!(matches!(fails("Nope 1"), JoeError::Name(_)));
        assert!(matches!(fails("G:Nope"), JoeError::Name(_)));
    }

    #[test]
    fn recursion_is_bounded() {
        let mut joe = Joe::without_prelude(Config::default().with_recursion_limit(64));
        let err = joe.load_str("F:~F\nF 1").unwrap_err();
        assert!(matches!(err, JoeError::RecursionLimit(64)), "{err}");
        let nested = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert!(matches!(joe.load_str(&nested), Err(JoeError::RecursionLimit(_))));
    }
}
