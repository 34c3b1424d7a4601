use thiserror::Error;

/// Construction-time rejection of a [`SimulationOptions`](crate::options::SimulationOptions) record.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("area_size must be positive, got {0}")]
    AreaSize(f32),
    #[error("avoidance_distance ({avoidance}) exceeds sight_distance ({sight})")]
    AvoidanceBeyondSight { avoidance: f32, sight: f32 },
    #[error("minimum_velocity ({min}) exceeds maximum_velocity ({max})")]
    VelocityBand { min: f32, max: f32 },
    #[error("sample_rate must be at least 1")]
    SampleRate,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulation options: {0}")]
    InvalidOptions(#[from] OptionsError),
    #[error("population columns disagree: {positions} positions, {velocities} velocities")]
    PopulationMismatch { positions: usize, velocities: usize },
    #[error("flock was torn down, no further passes may run")]
    Detached,
    #[error("can't write samples: {0}")]
    Io(#[from] std::io::Error),
    #[error("can't serialize samples: {0}")]
    Csv(#[from] csv::Error),
}
