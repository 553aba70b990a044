//! Nodes that wrap any node kind.

pub mod shot;

pub use shot::Shot;
