use std::fmt;

use crate::build::error::BuildError;

/*
Format Strings
==============

Every constructor declares the shape of its script argument with a short
format string. One character per slot, tuples in parentheses, lists in
brackets:

  d     integer                      Int
  f     number                       Num
  s     string                       Str
  eO    enum tag (O = oscillator)    OscType
  n     nil                          Nil
  P     parameter (num|Ctrl|Module)  Param
  C     controller box               Ctrl
  E     effect box                   Effect
  I     instrument box               Instr
  M     module box                   Module
  S     sequencer box                Seq
  *     any box                      Any
  (..)  tuple of exact arity         (a,b,..)
  [X]   list of X                    [X]

Examples:

  "(P,P)"              two parameters           → (Param,Param)
  "((f,f),(f,f,f,f))"  ADSR range and times     → ((Num,Num),(Num,Num,Num,Num))
  "[((d,f),(d,d,d))]"  a schedule               → [((Int,Num),(Int,Int,Int))]

The rendered form is what construction errors report as the expected shape.
*/

/// Enumerations recognized by `e<X>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    /// Oscillator waveform: sine, tri, square, impulse.
    Osc,
}

impl EnumKind {
    fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'O' => Some(EnumKind::Osc),
            _ => None,
        }
    }

    /// Accepted names, in tag order.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            EnumKind::Osc => &["sine", "tri", "square", "impulse"],
        }
    }

    pub fn lookup(self, name: &str) -> Option<usize> {
        self.names().iter().position(|&n| n == name)
    }

    fn label(self) -> &'static str {
        match self {
            EnumKind::Osc => "OscType",
        }
    }
}

/// Parsed format string.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Int,
    Num,
    Str,
    Enum(EnumKind),
    Nil,
    Param,
    Ctrl,
    Effect,
    Instr,
    Module,
    Seq,
    Any,
    Tuple(Vec<Shape>),
    List(Box<Shape>),
}

impl Shape {
    pub fn parse(format: &str) -> Result<Shape, BuildError> {
        let mut chars = format.chars().peekable();
        let shape = parse_one(&mut chars, format)?;

        if chars.next().is_some() {
            return Err(malformed(format, "trailing characters"));
        }

        Ok(shape)
    }
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

fn malformed(format: &str, reason: &'static str) -> BuildError {
    BuildError::Format {
        format: format.to_string(),
        reason,
    }
}

fn parse_one(chars: &mut Chars<'_>, format: &str) -> Result<Shape, BuildError> {
    let c = chars
        .next()
        .ok_or_else(|| malformed(format, "unexpected end"))?;

    let shape = match c {
        'd' => Shape::Int,
        'f' => Shape::Num,
        's' => Shape::Str,
        'n' => Shape::Nil,
        'P' => Shape::Param,
        'C' => Shape::Ctrl,
        'E' => Shape::Effect,
        'I' => Shape::Instr,
        'M' => Shape::Module,
        'S' => Shape::Seq,
        '*' => Shape::Any,
        'e' => {
            let tag = chars
                .next()
                .ok_or_else(|| malformed(format, "missing enum tag"))?;
            let kind =
                EnumKind::from_tag(tag).ok_or_else(|| malformed(format, "unknown enum tag"))?;
            Shape::Enum(kind)
        }
        '(' => {
            let mut items = vec![parse_one(chars, format)?];
            loop {
                match chars.next() {
                    Some(',') => items.push(parse_one(chars, format)?),
                    Some(')') => break,
                    _ => return Err(malformed(format, "unclosed tuple")),
                }
            }
            Shape::Tuple(items)
        }
        '[' => {
            let item = parse_one(chars, format)?;
            if chars.next() != Some(']') {
                return Err(malformed(format, "unclosed list"));
            }
            Shape::List(Box::new(item))
        }
        _ => return Err(malformed(format, "unknown format character")),
    };

    Ok(shape)
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Int => f.write_str("Int"),
            Shape::Num => f.write_str("Num"),
            Shape::Str => f.write_str("Str"),
            Shape::Enum(kind) => f.write_str(kind.label()),
            Shape::Nil => f.write_str("Nil"),
            Shape::Param => f.write_str("Param"),
            Shape::Ctrl => f.write_str("Ctrl"),
            Shape::Effect => f.write_str("Effect"),
            Shape::Instr => f.write_str("Instr"),
            Shape::Module => f.write_str("Module"),
            Shape::Seq => f.write_str("Seq"),
            Shape::Any => f.write_str("Any"),
            Shape::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            Shape::List(item) => write!(f, "[{}]", item),
        }
    }
}

/// Render a format string as the human-readable expected shape.
pub fn describe(format: &str) -> Result<String, BuildError> {
    Ok(Shape::parse(format)?.to_string())
}
