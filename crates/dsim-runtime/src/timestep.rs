use dsim_core::Timestep;

/// Produces the sequence of timesteps a `Simulator` drives the run through.
///
/// A trait rather than a fixed iterator so a deployment can model
/// irregular step sizes (e.g. slowing down around an event of interest)
/// without the `Simulator` caring.
pub trait TimestepGenerator: Send {
    /// The next timestep, or `None` once the run is complete.
    fn next(&mut self) -> Option<Timestep>;
}

/// Evenly spaced timesteps over `[start, end)`.
pub struct RangeTimestepGenerator {
    cursor: f64,
    end: f64,
    step_size: f64,
    step_index: f64,
}

impl RangeTimestepGenerator {
    pub fn new(start: f64, end: f64, step_size: f64) -> Self {
        assert!(step_size > 0.0, "step_size must be positive");
        Self {
            cursor: start,
            end,
            step_size,
            step_index: 0.0,
        }
    }
}

impl TimestepGenerator for RangeTimestepGenerator {
    fn next(&mut self) -> Option<Timestep> {
        if self.cursor >= self.end {
            return None;
        }
        let start = self.cursor;
        let end = (self.cursor + self.step_size).min(self.end);
        let ts = Timestep::new(self.step_index, start, end);
        self.cursor = end;
        self.step_index += 1.0;
        Some(ts)
    }
}
