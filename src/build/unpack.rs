use std::collections::VecDeque;

use crate::{
    build::{
        error::BuildError,
        format::{EnumKind, Shape},
        value::Value,
    },
    node::{Ctrl, Effect, Instrument, Module, NodeBox, Param, Sequencer},
};

/// One bound slot.
enum Arg {
    Int(i64),
    Num(f64),
    Str(String),
    Tag(usize),
    Nil,
    Param(Param),
    Ctrl(Ctrl),
    Effect(Box<dyn Effect>),
    Instr(Box<dyn Instrument>),
    Module(Box<dyn Module>),
    Seq(Box<dyn Sequencer>),
    Any(NodeBox),
    List(Vec<Args>),
}

impl Arg {
    fn name(&self) -> &'static str {
        match self {
            Arg::Int(_) => "Int",
            Arg::Num(_) => "Num",
            Arg::Str(_) => "Str",
            Arg::Tag(_) => "Tag",
            Arg::Nil => "Nil",
            Arg::Param(_) => "Param",
            Arg::Ctrl(_) => "Ctrl",
            Arg::Effect(_) => "Effect",
            Arg::Instr(_) => "Instr",
            Arg::Module(_) => "Module",
            Arg::Seq(_) => "Seq",
            Arg::Any(_) => "Any",
            Arg::List(_) => "List",
        }
    }
}

/// Slots bound by a successful `unpack`, handed out in format order.
///
/// Dropping `Args` releases every slot not taken yet.
#[derive(Default)]
pub struct Args {
    slots: VecDeque<Arg>,
}

macro_rules! take {
    ($(#[$doc:meta])* $fn:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $fn(&mut self) -> Result<$ty, BuildError> {
            match self.slots.pop_front() {
                Some(Arg::$variant(v)) => Ok(v),
                other => Err(self.misread(stringify!($variant), other)),
            }
        }
    };
}

impl Args {
    take!(int, Int, i64);
    take!(num, Num, f64);
    take!(string, Str, String);
    take!(
        /// Index into the enum's name table.
        tag,
        Tag,
        usize
    );
    take!(param, Param, Param);
    take!(ctrl, Ctrl, Ctrl);
    take!(effect, Effect, Box<dyn Effect>);
    take!(instr, Instr, Box<dyn Instrument>);
    take!(module, Module, Box<dyn Module>);
    take!(seq, Seq, Box<dyn Sequencer>);
    take!(
        /// Any boxed node, from `*`.
        any,
        Any,
        NodeBox
    );
    take!(
        /// Per-element slots of a `[X]` list.
        list,
        List,
        Vec<Args>
    );

    pub fn nil(&mut self) -> Result<(), BuildError> {
        match self.slots.pop_front() {
            Some(Arg::Nil) => Ok(()),
            other => Err(self.misread("Nil", other)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    fn misread(&self, wanted: &'static str, got: Option<Arg>) -> BuildError {
        let reason = match got {
            None => "no slot left",
            Some(arg) if arg.name() == wanted => "slot kind mismatch",
            Some(_) => "slot read with the wrong accessor",
        };
        BuildError::Format {
            format: wanted.to_string(),
            reason,
        }
    }
}

/// Unpack `value` according to `format`.
///
/// Either every slot binds and the `Args` are returned, or nothing is kept:
/// slots bound before the mismatch are dropped with the partial `Args`, and
/// the input value is consumed either way.
pub fn unpack(value: Value, format: &str) -> Result<Args, BuildError> {
    let shape = Shape::parse(format)?;
    let mut args = Args::default();

    if bind(value, &shape, &mut args) {
        Ok(args)
    } else {
        Err(BuildError::Type {
            expected: shape.to_string(),
        })
    }
}

fn bind(value: Value, shape: &Shape, args: &mut Args) -> bool {
    let arg = match (shape, value) {
        (Shape::Tuple(items), Value::Tuple(values)) => {
            if items.len() != values.len() {
                return false;
            }
            return items.iter().zip(values).all(|(s, v)| bind(v, s, args));
        }
        (Shape::List(item), Value::List(values)) => {
            let mut elems = Vec::with_capacity(values.len());
            for v in values {
                let mut elem = Args::default();
                if !bind(v, item, &mut elem) {
                    return false;
                }
                elems.push(elem);
            }
            Arg::List(elems)
        }
        (Shape::Int, Value::Num(n)) => match integral(n) {
            Some(i) => Arg::Int(i),
            None => return false,
        },
        (Shape::Num, Value::Num(n)) => Arg::Num(n),
        (Shape::Str, Value::Str(s)) => Arg::Str(s),
        (Shape::Enum(kind), Value::Str(s)) => match enum_tag(*kind, &s) {
            Some(tag) => Arg::Tag(tag),
            None => return false,
        },
        (Shape::Nil, Value::Nil) => Arg::Nil,
        (Shape::Param, Value::Num(n)) => Arg::Param(Param::flt(n)),
        (Shape::Param, Value::Box(NodeBox::Ctrl(ctrl))) => Arg::Param(Param::ctrl(ctrl)),
        (Shape::Param, Value::Box(NodeBox::Module(module))) => Arg::Param(Param::module(module)),
        (Shape::Ctrl, Value::Box(NodeBox::Ctrl(ctrl))) => Arg::Ctrl(ctrl),
        (Shape::Effect, Value::Box(NodeBox::Effect(effect))) => Arg::Effect(effect),
        (Shape::Instr, Value::Box(NodeBox::Instr(instr))) => Arg::Instr(instr),
        (Shape::Module, Value::Box(NodeBox::Module(module))) => Arg::Module(module),
        (Shape::Seq, Value::Box(NodeBox::Seq(seq))) => Arg::Seq(seq),
        (Shape::Any, Value::Box(boxed)) => Arg::Any(boxed),
        _ => return false,
    };

    args.slots.push_back(arg);
    true
}

fn integral(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

fn enum_tag(kind: EnumKind, name: &str) -> Option<usize> {
    kind.lookup(name)
}
