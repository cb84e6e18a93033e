//! Audio contexts
//!
//! The mixer never talks to a device directly. It drives an [`AudioContext`]
//! that owns a clocked [`Graph`]: either a real output stream or a virtual
//! clock that renders on demand.

use super::graph::{self, Graph, SharedGraph};
use crate::synth::sample_count;
use thiserror::Error;

/// Lifecycle of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Created but not producing audio yet
    Suspended,
    Running,
    /// Shut down for good
    Closed,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("audio start was refused (waiting for a user gesture)")]
    NotAllowed,
    #[error("no output device available")]
    NoDevice,
    #[error("audio context is closed")]
    Closed,
    #[error("audio device error: {0}")]
    Device(String),
}

/// Something that clocks a [`Graph`]
pub trait AudioContext {
    /// Start (or restart) producing audio
    fn resume(&mut self) -> Result<(), ContextError>;

    fn state(&self) -> ContextState;

    fn sample_rate(&self) -> u32;

    /// Handle to the graph this context renders
    fn graph(&self) -> SharedGraph;

    /// Stop producing audio and release the output
    fn close(&mut self);

    fn is_running(&self) -> bool {
        self.state() == ContextState::Running
    }
}

/// A context whose clock only moves when asked to
///
/// Used for offline bounces and for driving the mixer in tests.
pub struct VirtualContext {
    graph: SharedGraph,
    sample_rate: u32,
    state: ContextState,
    gesture_required: bool,
}

impl VirtualContext {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            graph: Graph::shared(sample_rate),
            sample_rate,
            state: ContextState::Suspended,
            gesture_required: false,
        }
    }

    /// A context that refuses to resume until [`allow`](Self::allow) is called
    pub fn gesture_gated(sample_rate: u32) -> Self {
        Self {
            gesture_required: true,
            ..Self::new(sample_rate)
        }
    }

    /// Record the user gesture a gated context is waiting for
    pub fn allow(&mut self) {
        self.gesture_required = false;
    }

    /// Render `secs` seconds of output
    ///
    /// A context that is not running stays silent and its clock stands still.
    pub fn advance(&mut self, secs: f64) -> Vec<f32> {
        self.advance_frames(sample_count(self.sample_rate, secs))
    }

    /// Render exactly `frames` samples
    pub fn advance_frames(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames];
        if self.state == ContextState::Running {
            graph::lock(&self.graph).render(&mut out);
        }
        out
    }

    /// Graph clock in seconds
    pub fn current_time(&self) -> f64 {
        graph::lock(&self.graph).current_time()
    }
}

impl AudioContext for VirtualContext {
    fn resume(&mut self) -> Result<(), ContextError> {
        match self.state {
            ContextState::Closed => Err(ContextError::Closed),
            _ if self.gesture_required => Err(ContextError::NotAllowed),
            _ => {
                self.state = ContextState::Running;
                Ok(())
            }
        }
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn graph(&self) -> SharedGraph {
        self.graph.clone()
    }

    fn close(&mut self) {
        self.state = ContextState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspended_clock_stands_still() {
        let mut ctx = VirtualContext::new(8000);
        let out = ctx.advance(0.5);
        assert_eq!(out.len(), 4000);
        assert_eq!(ctx.current_time(), 0.0);

        ctx.resume().unwrap();
        ctx.advance(0.5);
        assert!((ctx.current_time() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_gesture_gate() {
        let mut ctx = VirtualContext::gesture_gated(8000);
        assert!(matches!(ctx.resume(), Err(ContextError::NotAllowed)));
        assert_eq!(ctx.state(), ContextState::Suspended);

        ctx.allow();
        ctx.resume().unwrap();
        assert!(ctx.is_running());
    }

    #[test]
    fn test_closed_is_final() {
        let mut ctx = VirtualContext::new(8000);
        ctx.resume().unwrap();
        ctx.close();
        assert!(matches!(ctx.resume(), Err(ContextError::Closed)));
        assert_eq!(ctx.state(), ContextState::Closed);
    }
}
