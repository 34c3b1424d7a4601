use std::{fs::OpenOptions, mem, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::{
    driver::Presenter,
    error::SimulationError,
    flock::FlockView,
    options::SaveOptions,
};

/// One agent's presented state at one sampled tick.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct AgentSample {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub tick: u64,
}

/// A presenter that records every `sample_rate`-th presented frame.
pub struct Birdwatcher {
    samples: Vec<AgentSample>,
    render_ticker: u64,
    sample_rate: u64,
}

const PREFIX: &str = "boids-data";

impl Birdwatcher {
    pub fn new(sample_rate: u64) -> Self {
        Birdwatcher {
            samples: Vec::new(),
            render_ticker: 0,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Triggers data collection
    pub fn watch(&mut self, tick: u64, view: &FlockView<'_>) {
        if !self.should_sample() {
            return;
        }

        self.samples.extend(view.rows().map(|row| AgentSample {
            id: row.id,
            x: row.position.x,
            y: row.position.y,
            rotation: row.rotation,
            tick,
        }));
    }

    pub fn samples(&self) -> &[AgentSample] {
        &self.samples
    }

    pub fn pop_data(&mut self) -> Vec<AgentSample> {
        mem::take(&mut self.samples)
    }

    /// Returns the recorded samples while emptying the birdwatcher's memory,
    /// writing them out as CSV first when saving is on.
    ///
    /// Depending on save options, either overwrites `boids-data.csv` or writes a
    /// new timestamped file.
    pub fn pop_data_save(
        &mut self,
        save_options: &SaveOptions,
    ) -> Result<Vec<AgentSample>, SimulationError> {
        let data = self.pop_data();

        if !save_options.save_locations {
            return Ok(data);
        }

        if let Some(path) = &save_options.save_locations_path {
            let file_path =
                PathBuf::from(path).join(Birdwatcher::get_dataset_name(save_options, Utc::now()));

            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&file_path)?;
            let mut wtr = csv::Writer::from_writer(file);

            for sample in data.iter() {
                wtr.serialize(sample)?;
            }
            wtr.flush()?;

            debug!(
                path = %file_path.display(),
                rows = data.len(),
                "samples written"
            );
        }

        Ok(data)
    }

    fn get_dataset_name(save_options: &SaveOptions, now: DateTime<Utc>) -> String {
        match save_options.save_locations_timestamp {
            true => {
                let datetime_part = now.timestamp_millis();
                format!(
                    "{prefix}_{datetime}.csv",
                    prefix = PREFIX,
                    datetime = datetime_part
                )
            }
            false => format!("{prefix}.csv", prefix = PREFIX),
        }
    }

    fn should_sample(&mut self) -> bool {
        self.render_ticker += 1;

        self.render_ticker % self.sample_rate == 0
    }
}

impl Presenter for Birdwatcher {
    fn present(&mut self, tick: u64, view: &FlockView<'_>) {
        self.watch(tick, view);
    }
}
