//! Scheduled parameter ramps
//!
//! A gain value that approaches its target exponentially from the moment a
//! change is scheduled, in the graph's own clock. The controlling side only
//! ever schedules; the audio side only ever reads.

/// A `setTargetAtTime`-style automated value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioParam {
    start_value: f32,
    target: f32,
    start_time: f64,
    time_constant: f64,
}

impl AudioParam {
    /// A parameter resting at `value`
    pub fn new(value: f32) -> Self {
        Self {
            start_value: value,
            target: value,
            start_time: 0.0,
            time_constant: 1.0,
        }
    }

    /// Value the parameter is heading towards
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Value at graph time `t` seconds
    pub fn value_at(&self, t: f64) -> f32 {
        if t <= self.start_time || self.start_value == self.target {
            return self.start_value;
        }
        let elapsed = (t - self.start_time) / self.time_constant;
        let remaining = (self.start_value - self.target) as f64 * (-elapsed).exp();
        (self.target as f64 + remaining) as f32
    }

    /// Start approaching `target` at `start_time`
    ///
    /// The ramp begins from whatever value the previous ramp had reached by
    /// `start_time`, so back-to-back changes never jump.
    ///
    /// # Panics
    /// Panics if `time_constant` is not positive.
    pub fn set_target_at_time(&mut self, target: f32, start_time: f64, time_constant: f64) {
        assert!(time_constant > 0.0, "time constant must be positive");
        self.start_value = self.value_at(start_time);
        self.target = target;
        self.start_time = start_time;
        self.time_constant = time_constant;
    }
}
