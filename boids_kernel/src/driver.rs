use tracing::debug;

use crate::{
    error::SimulationError,
    flock::{Flock, FlockView},
};

/// Receives the read-only flock state once the physics ticks of a frame are done.
pub trait Presenter {
    fn present(&mut self, tick: u64, view: &FlockView<'_>);
}

/// Turns variable frame times into fixed physics ticks.
///
/// Per frame: every whole `step` of accumulated time becomes one tick
/// (acceleration pass, then move pass), at most `max_steps_per_frame` of them,
/// then the presenter sees the result.
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    step: f32,
    max_steps_per_frame: u32,
    accumulator: f32,
    ticks: u64,
}

impl FixedStepDriver {
    pub fn new(step: f32, max_steps_per_frame: u32) -> Self {
        FixedStepDriver {
            step,
            max_steps_per_frame,
            accumulator: 0.,
            ticks: 0,
        }
    }

    /// Feeds one frame's elapsed time. Returns the number of ticks run.
    pub fn advance<P: Presenter + ?Sized>(
        &mut self,
        frame_delta: f32,
        flock: &mut Flock,
        presenter: &mut P,
    ) -> Result<u32, SimulationError> {
        self.accumulator += frame_delta;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            flock.update(self.step)?;
            self.accumulator -= self.step;
            self.ticks += 1;
            steps += 1;
        }

        if steps == self.max_steps_per_frame && self.accumulator >= self.step {
            debug!(
                backlog = self.accumulator,
                "frame fell behind, dropping accumulated time"
            );
            self.accumulator = 0.;
        }

        presenter.present(self.ticks, &flock.view());

        Ok(steps)
    }

    /// Runs exactly `ticks` ticks, presenting after each one.
    pub fn run_ticks<P: Presenter + ?Sized>(
        &mut self,
        ticks: u64,
        flock: &mut Flock,
        presenter: &mut P,
    ) -> Result<(), SimulationError> {
        for _ in 0..ticks {
            flock.update(self.step)?;
            self.ticks += 1;
            presenter.present(self.ticks, &flock.view());
        }

        Ok(())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
