/// Hard cap on ticks run for a single frame; the remaining backlog is dropped
pub const MAX_STEPS_PER_FRAME: u32 = 8;

/// Turns variable frame time into a whole number of fixed ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepClock {
    pub fixed_dt: f32,
    accumulator: f32,
}

impl FixedStepClock {
    pub fn new(fixed_dt: f32) -> Self {
        Self { fixed_dt, accumulator: 0.0 }
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn consume_steps(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() {
            return 0;
        }
        self.accumulator += frame_dt.max(0.0);
        let mut steps = 0u32;
        while self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            steps += 1;
            if steps >= MAX_STEPS_PER_FRAME {
                self.accumulator = 0.0;
                break;
            }
        }
        steps
    }
}
