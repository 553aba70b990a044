use crate::{
    build::{BuildError, Value},
    node::{Clock, Effect, Instrument, NodeBox, Sequencer},
};

/// A set of engine slots waiting to be loaded.
///
/// Slots left empty keep whatever the engine is currently running.
#[derive(Clone, Default)]
pub struct Graph {
    pub clock: Option<Box<dyn Clock>>,
    pub seq: Option<Box<dyn Sequencer>>,
    pub instr: Option<Box<dyn Instrument>>,
    pub effect: [Option<Box<dyn Effect>>; 2],
    pub run: Option<bool>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an evaluated script value to a named slot.
    ///
    /// Slots are `amp.clock`, `amp.seq`, `amp.instr`, `amp.effect` (copied to
    /// both channels) and `amp.run` (a bool).
    pub fn bind(&mut self, name: &str, value: Value) -> Result<(), BuildError> {
        let wrong = || BuildError::Binding {
            name: name.to_string(),
        };

        match (name, value) {
            ("amp.run", Value::Bool(run)) => self.run = Some(run),
            ("amp.run", _) => return Err(wrong()),
            (slot, Value::Box(node)) => match slot {
                "amp.clock" => self.clock = Some(node.into_clock().map_err(|_| wrong())?),
                "amp.seq" => self.seq = Some(node.into_seq().map_err(|_| wrong())?),
                "amp.instr" => self.instr = Some(node.into_instr().map_err(|_| wrong())?),
                "amp.effect" => {
                    let effect = node.into_effect().map_err(|_| wrong())?;
                    self.effect = [Some(effect.clone()), Some(effect)];
                }
                _ => return Err(BuildError::Unbound(name.to_string())),
            },
            ("amp.clock" | "amp.seq" | "amp.instr" | "amp.effect", _) => return Err(wrong()),
            _ => return Err(BuildError::Unbound(name.to_string())),
        }

        Ok(())
    }

    pub fn with(mut self, name: &str, node: NodeBox) -> Result<Self, BuildError> {
        self.bind(name, Value::Box(node))?;
        Ok(self)
    }
}
