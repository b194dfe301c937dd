use std::{error::Error, fmt, io, ops::Range, path::PathBuf};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use colored::*;

use crate::{CodeSpan, Ident, LexError, Sp};

#[derive(Debug)]
pub enum JoeError {
    Lex(Sp<LexError>),
    Parse(Sp<String>),
    Name(Ident),
    Type(String),
    Shape(String),
    RecursionLimit(usize),
    Load(PathBuf, io::Error),
}

pub type JoeResult<T = ()> = Result<T, JoeError>;

impl JoeError {
    pub(crate) fn parse(span: CodeSpan, message: impl Into<String>) -> Self {
        JoeError::Parse(span.sp(message.into()))
    }
    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        JoeError::Type(message.into())
    }
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        JoeError::Shape(message.into())
    }
    /// The short name of the error's kind
    pub fn kind(&self) -> &'static str {
        match self {
            JoeError::Lex(_) => "LexError",
            JoeError::Parse(_) => "ParseError",
            JoeError::Name(_) => "NameError",
            JoeError::Type(_) => "TypeError",
            JoeError::Shape(_) => "ShapeError",
            JoeError::RecursionLimit(_) => "RecursionLimit",
            JoeError::Load(..) => "LoadError",
        }
    }
    /// The span of source text the error points at, if any
    pub fn span(&self) -> Option<CodeSpan> {
        match self {
            JoeError::Lex(e) => Some(e.span),
            JoeError::Parse(e) => Some(e.span),
            _ => None,
        }
    }
    /// The message without location information
    pub fn message(&self) -> String {
        match self {
            JoeError::Lex(e) => e.value.to_string(),
            JoeError::Parse(e) => e.value.clone(),
            error => error.to_string(),
        }
    }
    /// Render the error for a terminal, pointing into `src` when possible
    pub fn report(&self, src: &str) -> String {
        let color = colored::control::SHOULD_COLORIZE.should_colorize();
        let Some(span) = self.span().filter(|span| span.end.byte_pos as usize <= src.len())
        else {
            return format!("{}: {}", self.kind().red().bold(), self.message());
        };
        let range: Range<usize> = span.byte_range();
        let config = Config::default().with_color(color);
        let mut buffer = Vec::new();
        let report = Report::build(ReportKind::Error, ("input", range.clone()))
            .with_config(config)
            .with_message(format!("{}: {}", self.kind(), self.message()))
            .with_label(if color {
                Label::new(("input", range)).with_color(Color::Red)
            } else {
                Label::new(("input", range))
            })
            .finish();
        if report.write(("input", Source::from(src)), &mut buffer).is_err() {
            return format!("{}: {}", self.kind().red().bold(), self.message());
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl fmt::Display for JoeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoeError::Lex(e) => write!(f, "{e}"),
            JoeError::Parse(e) => write!(f, "{e}"),
            JoeError::Name(name) => write!(f, "{name} is not bound"),
            JoeError::Type(message) | JoeError::Shape(message) => write!(f, "{message}"),
            JoeError::RecursionLimit(limit) => {
                write!(f, "Recursion limit of {limit} exceeded")
            }
            JoeError::Load(path, e) => {
                write!(f, "failed to load {}: {e}", path.to_string_lossy())
            }
        }
    }
}

impl Error for JoeError {}

impl From<Sp<LexError>> for JoeError {
    fn from(e: Sp<LexError>) -> Self {
        JoeError::Lex(e)
    }
}

impl From<Sp<String>> for JoeError {
    fn from(e: Sp<String>) -> Self {
        JoeError::Parse(e)
    }
}
