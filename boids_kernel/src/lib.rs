use birdwatcher::{AgentSample, Birdwatcher};
use driver::FixedStepDriver;
use error::SimulationError;
use flock::{Flock, FlockSummary};
use options::SimulationOptions;

pub mod acceleration;
pub mod agents;
pub mod flock;
pub mod movement;

pub mod birdwatcher;
pub mod driver;
pub mod error;
pub mod math_helpers;
pub mod options;

/// What a headless run leaves behind.
#[derive(Debug, Clone)]
pub struct HeadlessRun {
    pub ticks: u64,
    /// population figures after the last tick
    pub summary: FlockSummary,
    pub samples: Vec<AgentSample>,
}

/// Runs `ticks` fixed ticks of `delta_time` seconds and returns the recorded
/// samples, saving them when the options ask for it.
pub fn run_headless(
    ticks: u64,
    delta_time: f32,
    options: SimulationOptions,
) -> Result<HeadlessRun, SimulationError> {
    let mut flock = Flock::new(options)?;
    let mut driver = FixedStepDriver::new(delta_time, 1);
    let mut bird_watcher = Birdwatcher::new(flock.options().sample_rate);

    driver.run_ticks(ticks, &mut flock, &mut bird_watcher)?;

    let summary = flock.summary();
    flock.teardown();

    let samples = bird_watcher.pop_data_save(&flock.options().save_options)?;

    Ok(HeadlessRun {
        ticks: driver.ticks(),
        summary,
        samples,
    })
}
