use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Full parameter record of a run. Read-only once a [`Flock`](crate::flock::Flock)
/// has been built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    pub init_agents: usize,
    pub initiation_strat: InitiationStrategy,
    /// seed for population placement, `None` draws one from the OS
    pub seed: Option<u64>,

    pub avoidance_distance: f32,
    pub sight_distance: f32,

    pub cohesion_factor: f32,
    pub separation_factor: f32,
    pub alignment_factor: f32,
    /// exponent `k` of the `1/d^k` separation weighting
    pub separation_falloff: f32,

    /// side of the square `[0, area_size] x [0, area_size]`
    pub area_size: f32,
    pub border_sight_distance: f32,
    pub border_avoidance_factor: f32,
    pub boundary: Boundary,

    pub maximum_velocity: f32,
    pub minimum_velocity: f32,

    pub sample_rate: u64,
    pub save_options: SaveOptions,
}

impl SimulationOptions {
    /// Checks the record once, at construction time. Nothing is re-checked per tick.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let scalars = [
            ("avoidance_distance", self.avoidance_distance),
            ("sight_distance", self.sight_distance),
            ("cohesion_factor", self.cohesion_factor),
            ("separation_factor", self.separation_factor),
            ("alignment_factor", self.alignment_factor),
            ("separation_falloff", self.separation_falloff),
            ("area_size", self.area_size),
            ("border_sight_distance", self.border_sight_distance),
            ("border_avoidance_factor", self.border_avoidance_factor),
            ("maximum_velocity", self.maximum_velocity),
            ("minimum_velocity", self.minimum_velocity),
        ];

        if let Some(&(name, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(OptionsError::NotFinite { name, value });
        }

        if self.area_size <= 0. {
            return Err(OptionsError::AreaSize(self.area_size));
        }

        // factors may be zero (behaviour switched off) but never negative
        if let Some(&(name, value)) = scalars.iter().find(|(_, v)| *v < 0.) {
            return Err(OptionsError::Negative { name, value });
        }

        if self.avoidance_distance > self.sight_distance {
            return Err(OptionsError::AvoidanceBeyondSight {
                avoidance: self.avoidance_distance,
                sight: self.sight_distance,
            });
        }

        if self.minimum_velocity > self.maximum_velocity {
            return Err(OptionsError::VelocityBand {
                min: self.minimum_velocity,
                max: self.maximum_velocity,
            });
        }

        if self.sample_rate == 0 {
            return Err(OptionsError::SampleRate);
        }

        Ok(())
    }

    /// The subset of parameters the neighbour scan needs.
    pub fn steering_params(&self) -> SteeringParams {
        SteeringParams {
            avoidance_distance: self.avoidance_distance,
            sight_distance: self.sight_distance,
            cohesion_factor: self.cohesion_factor,
            separation_factor: self.separation_factor,
            alignment_factor: self.alignment_factor,
            separation_falloff: self.separation_falloff,
        }
    }

    /// The subset of parameters the move pass needs.
    pub fn motion_params(&self) -> MotionParams {
        MotionParams {
            area_size: self.area_size,
            border_sight_distance: self.border_sight_distance,
            border_avoidance_factor: self.border_avoidance_factor,
            maximum_velocity: self.maximum_velocity,
            minimum_velocity: self.minimum_velocity,
            boundary: self.boundary,
        }
    }
}

impl Default for SimulationOptions {
    fn default() -> Self {
        let area_size = 100.;

        let sight_distance = 10.;
        let avoidance_distance = 2.;

        let min_speed = 2.;
        let max_speed = 10.;

        SimulationOptions {
            init_agents: 512,
            initiation_strat: InitiationStrategy::RandomRandom,
            seed: None,
            avoidance_distance,
            sight_distance,
            cohesion_factor: 1.,
            separation_factor: 4.,
            alignment_factor: 0.5,
            separation_falloff: 1.,
            area_size,
            border_sight_distance: 10.,
            border_avoidance_factor: 20.,
            boundary: Boundary::Clamp,
            maximum_velocity: max_speed,
            minimum_velocity: min_speed,
            sample_rate: 1,
            save_options: SaveOptions {
                save_locations: false,
                save_locations_path: Some("./".to_owned()),
                save_locations_timestamp: true,
            },
        }
    }
}

/// Parameters visible to the acceleration pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    pub avoidance_distance: f32,
    pub sight_distance: f32,
    pub cohesion_factor: f32,
    pub separation_factor: f32,
    pub alignment_factor: f32,
    pub separation_falloff: f32,
}

/// Parameters visible to the move pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub area_size: f32,
    pub border_sight_distance: f32,
    pub border_avoidance_factor: f32,
    pub maximum_velocity: f32,
    pub minimum_velocity: f32,
    pub boundary: Boundary,
}

#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
// {"type": "CircleCircumferenceIn"}
pub enum InitiationStrategy {
    /// agents on a ring around the centre, heading inwards
    CircleCircumferenceIn,
    /// uniform positions over the area, uniform velocities within the speed band
    RandomRandom,
}

/// How the move pass keeps agents inside the area after integrating.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Boundary {
    /// hard clamp onto the nearest edge
    Clamp,
    /// wrap around to the opposite edge
    Toroidal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOptions {
    pub save_locations: bool,
    pub save_locations_path: Option<String>,
    pub save_locations_timestamp: bool,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Boundary, InitiationStrategy, SimulationOptions};
    use crate::error::OptionsError;

    #[test]
    fn default_options_are_valid() {
        assert_eq!(SimulationOptions::default().validate(), Ok(()));
    }

    #[rstest]
    #[case::avoidance_beyond_sight(|o: &mut SimulationOptions| o.avoidance_distance = 20.)]
    #[case::inverted_velocity_band(|o: &mut SimulationOptions| o.minimum_velocity = 50.)]
    #[case::zero_area(|o: &mut SimulationOptions| o.area_size = 0.)]
    #[case::negative_area(|o: &mut SimulationOptions| o.area_size = -10.)]
    #[case::negative_factor(|o: &mut SimulationOptions| o.cohesion_factor = -1.)]
    #[case::negative_falloff(|o: &mut SimulationOptions| o.separation_falloff = -0.5)]
    #[case::nan_sight(|o: &mut SimulationOptions| o.sight_distance = f32::NAN)]
    #[case::zero_sample_rate(|o: &mut SimulationOptions| o.sample_rate = 0)]
    fn rejects_out_of_range(#[case] tweak: fn(&mut SimulationOptions)) {
        let mut options = SimulationOptions::default();
        tweak(&mut options);

        assert!(options.validate().is_err());
    }

    #[test]
    fn reports_offending_velocity_band() {
        let mut options = SimulationOptions::default();
        options.minimum_velocity = 6.;
        options.maximum_velocity = 5.;

        assert_eq!(
            options.validate(),
            Err(OptionsError::VelocityBand { min: 6., max: 5. })
        );
    }

    #[test]
    fn area_size_checked_before_sign() {
        let mut options = SimulationOptions::default();
        options.area_size = -1.;

        assert_eq!(options.validate(), Err(OptionsError::AreaSize(-1.)));
    }

    #[test]
    fn equal_distances_and_speeds_are_allowed() {
        let mut options = SimulationOptions::default();
        options.avoidance_distance = options.sight_distance;
        options.minimum_velocity = options.maximum_velocity;

        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn deserializes_partial_record_over_defaults() {
        let json = r#"{
            "area_size": 250.0,
            "boundary": {"type": "Toroidal"},
            "initiation_strat": {"type": "CircleCircumferenceIn"}
        }"#;

        let options: SimulationOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.area_size, 250.);
        assert_eq!(options.boundary, Boundary::Toroidal);
        assert_eq!(
            options.initiation_strat,
            InitiationStrategy::CircleCircumferenceIn
        );
        assert_eq!(options.sight_distance, SimulationOptions::default().sight_distance);
    }

    #[test]
    fn param_views_carry_the_record() {
        let options = SimulationOptions::default();
        let steering = options.steering_params();
        let motion = options.motion_params();

        assert_eq!(steering.sight_distance, options.sight_distance);
        assert_eq!(steering.separation_falloff, options.separation_falloff);
        assert_eq!(motion.area_size, options.area_size);
        assert_eq!(motion.boundary, options.boundary);
    }
}
