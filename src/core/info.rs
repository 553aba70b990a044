use crate::core::{
    event::{Action, Note, Seek},
    time::Time,
};

/// Control-rate message broadcast through a node graph.
///
/// Composite nodes forward every message to all of their children, whether
/// or not the children care, so transport and note state reach every leaf.
#[derive(Debug)]
pub enum Info<'a> {
    /// Components are being initialized.
    Init,
    /// Pending data should be committed.
    Commit,
    /// A controller or sequencer event.
    Action(&'a Action),
    /// Per-voice note setup from a polyphonic owner.
    Note(&'a Note),
    /// Ask the clock for its current position.
    Tell(&'a mut Time),
    /// Move the transport. The clock writes back where it landed.
    Seek(&'a mut Seek),
    /// Start the transport.
    Start(&'a mut Seek),
    /// Stop the transport.
    Stop(&'a mut Seek),
}

impl Info<'_> {
    /// The action carried by this message, if any.
    pub fn action(&self) -> Option<&Action> {
        match self {
            Info::Action(action) => Some(action),
            _ => None,
        }
    }

    /// The note carried by this message, if any.
    pub fn note(&self) -> Option<&Note> {
        match self {
            Info::Note(note) => Some(note),
            _ => None,
        }
    }
}
