//! Block-based synthesis engine core.
//!
//! A graph is one [`Clock`](node::Clock), an optional
//! [`Sequencer`](node::Sequencer), an optional
//! [`Instrument`](node::Instrument) and one [`Effect`](node::Effect) per
//! channel. Once per audio block the [`Engine`](engine::Engine) steps the
//! clock, lets the sequencer fill the event [`Queue`](core::Queue), and renders
//! the instrument and effects in place.
//!
//! Graphs are built from script values through [`build::Env`].

pub mod build;
pub mod clock;
pub mod core;
pub mod effect;
pub mod engine;
pub mod instr;
pub mod io;
pub mod module;
pub mod node;
pub mod poly;
pub mod seq;

/// Longest block rendered in one pass. Larger host buffers are split.
pub const MAX_BLOCK_SIZE: usize = 2048;
