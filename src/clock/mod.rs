//! Clocks: the source of every block's time array.

pub mod basic;

pub use basic::Basic;
