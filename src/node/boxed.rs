use std::fmt;

use crate::node::{Clock, Ctrl, Effect, Instrument, Module, Sequencer};

/// Which node kind a box holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    Clock,
    Ctrl,
    Effect,
    Instr,
    Module,
    Seq,
}

impl BoxKind {
    pub fn name(self) -> &'static str {
        match self {
            BoxKind::Clock => "Clock",
            BoxKind::Ctrl => "Ctrl",
            BoxKind::Effect => "Effect",
            BoxKind::Instr => "Instr",
            BoxKind::Module => "Module",
            BoxKind::Seq => "Seq",
        }
    }
}

impl fmt::Display for BoxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A constructed node tagged with its kind, as it travels through script values.
#[derive(Clone)]
pub enum NodeBox {
    Clock(Box<dyn Clock>),
    Ctrl(Ctrl),
    Effect(Box<dyn Effect>),
    Instr(Box<dyn Instrument>),
    Module(Box<dyn Module>),
    Seq(Box<dyn Sequencer>),
}

impl NodeBox {
    pub fn clock(clock: impl Clock + 'static) -> Self {
        NodeBox::Clock(Box::new(clock))
    }

    pub fn effect(effect: impl Effect + 'static) -> Self {
        NodeBox::Effect(Box::new(effect))
    }

    pub fn instr(instr: impl Instrument + 'static) -> Self {
        NodeBox::Instr(Box::new(instr))
    }

    pub fn module(module: impl Module + 'static) -> Self {
        NodeBox::Module(Box::new(module))
    }

    pub fn seq(seq: impl Sequencer + 'static) -> Self {
        NodeBox::Seq(Box::new(seq))
    }

    pub fn kind(&self) -> BoxKind {
        match self {
            NodeBox::Clock(_) => BoxKind::Clock,
            NodeBox::Ctrl(_) => BoxKind::Ctrl,
            NodeBox::Effect(_) => BoxKind::Effect,
            NodeBox::Instr(_) => BoxKind::Instr,
            NodeBox::Module(_) => BoxKind::Module,
            NodeBox::Seq(_) => BoxKind::Seq,
        }
    }

    // Each `into_*` hands the box back untouched on a kind mismatch.

    pub fn into_clock(self) -> Result<Box<dyn Clock>, NodeBox> {
        match self {
            NodeBox::Clock(clock) => Ok(clock),
            other => Err(other),
        }
    }

    pub fn into_ctrl(self) -> Result<Ctrl, NodeBox> {
        match self {
            NodeBox::Ctrl(ctrl) => Ok(ctrl),
            other => Err(other),
        }
    }

    pub fn into_effect(self) -> Result<Box<dyn Effect>, NodeBox> {
        match self {
            NodeBox::Effect(effect) => Ok(effect),
            other => Err(other),
        }
    }

    pub fn into_instr(self) -> Result<Box<dyn Instrument>, NodeBox> {
        match self {
            NodeBox::Instr(instr) => Ok(instr),
            other => Err(other),
        }
    }

    pub fn into_module(self) -> Result<Box<dyn Module>, NodeBox> {
        match self {
            NodeBox::Module(module) => Ok(module),
            other => Err(other),
        }
    }

    pub fn into_seq(self) -> Result<Box<dyn Sequencer>, NodeBox> {
        match self {
            NodeBox::Seq(seq) => Ok(seq),
            other => Err(other),
        }
    }
}

impl fmt::Debug for NodeBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeBox::Ctrl(ctrl) => f.debug_tuple("Ctrl").field(ctrl).finish(),
            other => write!(f, "{}(..)", other.kind()),
        }
    }
}
