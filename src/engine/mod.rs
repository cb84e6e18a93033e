//! Live engine
//!
//! A clocked voice graph behind an injectable audio context, the mixer that
//! controls it, and a recorder for bouncing mixes offline.

pub mod context;
pub mod graph;
pub mod mixer;
pub mod param;
pub mod player;
pub mod recorder;

pub use context::{AudioContext, ContextError, ContextState, VirtualContext};
pub use graph::{Graph, SharedGraph};
pub use mixer::{Mixer, TrackState, MAX_VOLUME};
pub use param::AudioParam;
pub use player::{default_device_name, list_output_devices, CpalContext};
pub use recorder::{bounce, Recorder};
