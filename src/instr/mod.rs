//! Instruments: stereo sources.

pub mod inject;
pub mod mixer;
pub mod pan;
pub mod series;
pub mod single;

pub use inject::Inject;
pub use mixer::Mixer;
pub use pan::Pan;
pub use series::Series;
pub use single::Single;
