//! Turning script values into nodes.
//!
//! A constructor receives one [`Value`] and a [`BuildContext`], unpacks the
//! value against its format string and returns the node as a [`NodeBox`].
//! [`Env`] maps constructor names to those functions and evaluates nested
//! `Call` values from the inside out.

use std::collections::HashMap;

use tracing::debug;

use crate::{io::SampleCache, node::NodeBox};

pub mod error;
pub mod format;
pub mod unpack;
pub mod value;

pub use error::BuildError;
pub use format::{describe, EnumKind, Shape};
pub use unpack::{unpack, Args};
pub use value::Value;

/// Shared state every constructor can read.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub rate: u32,
    pub cache: SampleCache,
}

impl BuildContext {
    pub fn new(rate: u32) -> Self {
        Self {
            rate,
            cache: SampleCache::new(),
        }
    }

    pub fn with_cache(mut self, cache: SampleCache) -> Self {
        self.cache = cache;
        self
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(48_000)
    }
}

pub type Constructor = fn(Value, &BuildContext) -> Result<NodeBox, BuildError>;

/// Named constructors.
#[derive(Clone, Default)]
pub struct Env {
    ctors: HashMap<String, Constructor>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment with every built-in node registered.
    pub fn core() -> Self {
        use crate::{clock, effect, instr, module, node::ctrl, poly, seq};

        let mut env = Env::new();

        env.bind("Ctrl", ctrl::make_linear);
        env.bind("ExpCtrl", ctrl::make_exponential);

        env.bind("Basic", clock::basic::make);

        env.bind("Sched", seq::sched::make);
        env.bind("Repeat", seq::repeat::make);
        env.bind("Toggle", seq::toggle::make);
        env.bind("Merge", seq::merge::make);
        env.bind("Enable", seq::enable::make);

        env.bind("Chain", effect::chain::make);
        env.bind("Gain", effect::gain::make);
        env.bind("Gate", effect::gate::make);
        env.bind("Synth", effect::synth::make);

        env.bind("Mixer", instr::mixer::make);
        env.bind("Single", instr::single::make);
        env.bind("Inject", instr::inject::make);
        env.bind("Series", instr::series::make);
        env.bind("Pan", instr::pan::make);

        env.bind("Shot", poly::shot::make);

        env.bind("ADSR", module::adsr::make);
        env.bind("Osc", module::osc::make);
        env.bind("Sine", module::osc::make_sine);
        env.bind("Tri", module::osc::make_tri);
        env.bind("Square", module::osc::make_square);
        env.bind("Impulse", module::osc::make_impulse);
        env.bind("Ramp", module::ramp::make);
        env.bind("Trig", module::trig::make);
        env.bind("Noise", module::noise::make);
        env.bind("Sum", module::sum::make);
        env.bind("Mul", module::mul::make);
        env.bind("Patch", module::patch::make);
        env.bind("Sample", module::sample::make);

        debug!(constructors = env.ctors.len(), "core environment ready");
        env
    }

    /// Register (or replace) a constructor.
    pub fn bind(&mut self, name: impl Into<String>, ctor: Constructor) {
        self.ctors.insert(name.into(), ctor);
    }

    pub fn lookup(&self, name: &str) -> Option<Constructor> {
        self.ctors.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(String::as_str)
    }

    /// Apply the constructor `name` to an already evaluated argument.
    pub fn construct(
        &self,
        name: &str,
        arg: Value,
        cx: &BuildContext,
    ) -> Result<NodeBox, BuildError> {
        let ctor = self
            .lookup(name)
            .ok_or_else(|| BuildError::Unbound(name.to_string()))?;

        let node = ctor(arg, cx)?;
        debug!(name, kind = %node.kind(), "constructed node");

        Ok(node)
    }

    /// Evaluate every `Call` in `value`, innermost first.
    pub fn eval(&self, value: Value, cx: &BuildContext) -> Result<Value, BuildError> {
        match value {
            Value::Call(name, arg) => {
                let arg = self.eval(*arg, cx)?;
                self.construct(&name, arg, cx).map(Value::Box)
            }
            Value::Tuple(items) => items
                .into_iter()
                .map(|v| self.eval(v, cx))
                .collect::<Result<_, _>>()
                .map(Value::Tuple),
            Value::List(items) => items
                .into_iter()
                .map(|v| self.eval(v, cx))
                .collect::<Result<_, _>>()
                .map(Value::List),
            other => Ok(other),
        }
    }

    /// Evaluate `value` down to a single node.
    pub fn build(&self, value: Value, cx: &BuildContext) -> Result<NodeBox, BuildError> {
        match self.eval(value, cx)? {
            Value::Box(node) => Ok(node),
            other => {
                debug!(got = other.type_name(), "script did not produce a node");
                Err(BuildError::Type {
                    expected: "Box".into(),
                })
            }
        }
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Env").field("ctors", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::BoxKind;

    #[test]
    fn evaluates_nested_calls() {
        let env = Env::core();
        let cx = BuildContext::default();

        let script = Value::call(
            "Chain",
            Value::list([
                Value::call("Gain", Value::Num(0.5)),
                Value::call("Gain", Value::call("Ctrl", Value::from(((1, 7), (0.0, 1.0), 0.5)))),
            ]),
        );

        let node = env.build(script, &cx).expect("build");
        assert_eq!(node.kind(), BoxKind::Effect);
    }

    #[test]
    fn unknown_constructor_is_unbound() {
        let env = Env::core();
        let err = env.build(Value::call("Reverb", Value::Nil), &BuildContext::default());
        assert_eq!(err.err(), Some(BuildError::Unbound("Reverb".into())));
    }

    #[test]
    fn plain_values_are_not_nodes() {
        let env = Env::core();
        assert!(matches!(
            env.build(Value::Num(1.0), &BuildContext::default()),
            Err(BuildError::Type { .. })
        ));
    }

    #[test]
    fn failure_deep_in_a_list_is_reported() {
        let env = Env::core();
        let script = Value::call(
            "Chain",
            Value::list([
                Value::call("Gain", Value::Num(0.5)),
                Value::call("Gain", Value::str("loud")),
            ]),
        );
        let err = env.build(script, &BuildContext::default()).err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("Type error. Expected 'Param'.")
        );
    }

    #[test]
    fn core_registers_the_catalogue() {
        let env = Env::core();
        let names = [
            "Basic", "Sched", "Merge", "Enable", "Synth", "Series", "Pan", "ADSR", "Sample",
            "ExpCtrl", "Shot",
        ];
        for name in names {
            assert!(env.lookup(name).is_some(), "{name} missing");
        }
    }
}
