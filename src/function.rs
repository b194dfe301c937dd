use std::{fmt, rc::Rc};

use ecow::EcoVec;

use crate::{format_num, Adverb, Conjunction, Ident, Primitive, Value};

/// An invocable unit
///
/// Functions are immutable. Combinators wrap their operands and share them
/// rather than copying them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    /// A built-in function
    Primitive(Primitive),
    /// A name looked up in the binding environment when called
    Bound(Ident),
    /// A function with its left argument fixed
    Fixed { left: Value, f: Rc<Function> },
    /// An adverb applied to a function
    Adverbed { adverb: Adverb, f: Rc<Function> },
    /// A conjunction applied to two operands
    Conjoined {
        conj: Conjunction,
        left: Rc<Operand>,
        right: Rc<Operand>,
    },
    /// A dispatch table of functions
    Agenda(EcoVec<Function>),
    /// Functions applied right to left
    Composed(EcoVec<Function>),
    /// A fork train
    Train(EcoVec<Function>),
}

/// An operand of a conjunction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Function(Function),
    Value(Value),
}

impl From<Primitive> for Function {
    fn from(prim: Primitive) -> Self {
        Function::Primitive(prim)
    }
}

impl From<Function> for Operand {
    fn from(f: Function) -> Self {
        Operand::Function(f)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl Function {
    pub fn fixed(left: Value, f: Function) -> Self {
        Function::Fixed {
            left,
            f: Rc::new(f),
        }
    }
    pub fn adverbed(adverb: Adverb, f: Function) -> Self {
        Function::Adverbed {
            adverb,
            f: Rc::new(f),
        }
    }
    pub fn conjoined(conj: Conjunction, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Function::Conjoined {
            conj,
            left: Rc::new(left.into()),
            right: Rc::new(right.into()),
        }
    }
    /// Get the primitive this function is, if it is one
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Function::Primitive(prim) => Some(*prim),
            _ => None,
        }
    }
    pub fn is_agenda(&self) -> bool {
        matches!(self, Function::Agenda(_))
    }
    fn needs_parens(&self) -> bool {
        matches!(self, Function::Conjoined { .. } | Function::Fixed { .. })
    }
}

impl Operand {
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Operand::Function(f) => Some(f),
            Operand::Value(_) => None,
        }
    }
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Operand::Value(value) => Some(value),
            Operand::Function(_) => None,
        }
    }
}

/// Write a value as a literal that reads back as the same value
pub fn source_literal(value: &Value) -> String {
    match value {
        Value::Num(n) => format_num(*n).replace('-', "_"),
        Value::Char(c) => format!("'{}", c.escape_debug()),
        Value::Seq(cells) if cells.is_empty() => "[]".into(),
        Value::Seq(_) if value.is_text() => {
            let text: String = value.as_text().unwrap_or_default();
            format!("{text:?}")
        }
        Value::Seq(cells) if cells.len() == 1 => format!("[{}]", source_literal(&cells[0])),
        Value::Seq(cells) => {
            let mut s = String::new();
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    s.push(' ');
                }
                match cell {
                    Value::Seq(inner) if inner.len() > 1 && !cell.is_text() => {
                        s.push('(');
                        s.push_str(&source_literal(cell));
                        s.push(')');
                    }
                    _ => s.push_str(&source_literal(cell)),
                }
            }
            s
        }
    }
}

fn fmt_operand(f: &mut fmt::Formatter<'_>, operand: &Operand) -> fmt::Result {
    match operand {
        Operand::Value(value) if value.len() > 1 && !value.is_text() => {
            write!(f, "({})", source_literal(value))
        }
        Operand::Value(value) => write!(f, "{}", source_literal(value)),
        Operand::Function(func) if func.needs_parens() => write!(f, "({func})"),
        Operand::Function(func) => write!(f, "{func}"),
    }
}

/// Functions display in source form
impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Primitive(prim) => write!(f, "{prim}"),
            Function::Bound(name) => write!(f, "{name}"),
            Function::Fixed { left, f: func } => {
                fmt_operand(f, &Operand::Value(left.clone()))?;
                if func.needs_parens() {
                    write!(f, "({func})")
                } else {
                    write!(f, "{func}")
                }
            }
            Function::Adverbed { adverb, f: func } => {
                if func.needs_parens() {
                    write!(f, "{adverb}({func})")
                } else {
                    write!(f, "{adverb}{func}")
                }
            }
            Function::Conjoined { conj, left, right } => {
                fmt_operand(f, left)?;
                write!(f, "{conj}")?;
                fmt_operand(f, right)
            }
            Function::Agenda(fs) => {
                for (i, func) in fs.iter().enumerate() {
                    if i > 0 {
                        write!(f, "`")?;
                    }
                    fmt_operand(f, &Operand::Function(func.clone()))?;
                }
                Ok(())
            }
            Function::Composed(fs) | Function::Train(fs) => {
                let (open, close) = if let Function::Train(_) = self {
                    ('{', '}')
                } else {
                    ('(', ')')
                };
                write!(f, "{open}")?;
                for (i, func) in fs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{func}")?;
                }
                write!(f, "{close}")
            }
        }
    }
}

/// Values display as output, functions in source form
impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Function(func) => write!(f, "{func}"),
            Operand::Value(value) => write!(f, "{}", value.show()),
        }
    }
}
