use glam::Vec2;
use rayon::prelude::*;
use tracing::{info, trace_span, warn};

use crate::{
    acceleration,
    agents::{AgentRow, AgentState},
    error::SimulationError,
    movement,
    options::{MotionParams, SimulationOptions, SteeringParams},
};

/// Smallest number of agents a rayon task handles in either pass.
const MIN_AGENTS_PER_TASK: usize = 8;

/// The simulation core: owns the population and runs the two per-tick passes.
///
/// Both passes take `&mut self`, so a pass can never overlap another pass or a
/// reader of [`FlockView`]. Returning from a pass means every agent has been
/// updated.
pub struct Flock {
    agents: AgentState,
    options: SimulationOptions,
    steering: SteeringParams,
    motion: MotionParams,
    attached: bool,
}

/// Read-only state handed to presentation after a move pass.
pub struct FlockView<'a> {
    agents: &'a AgentState,
}

/// Population-wide figures for run reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockSummary {
    pub agents: usize,
    pub centroid: Vec2,
    pub mean_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Flock {
    /// Seeds a population from `options`.
    pub fn new(options: SimulationOptions) -> Result<Self, SimulationError> {
        options.validate()?;
        let agents = AgentState::seeded(&options);

        Self::with_agents(options, agents)
    }

    /// Wraps an existing population.
    pub fn with_agents(
        options: SimulationOptions,
        agents: AgentState,
    ) -> Result<Self, SimulationError> {
        options.validate()?;

        info!(
            agents = agents.len(),
            area_size = options.area_size,
            "flock attached"
        );

        Ok(Flock {
            steering: options.steering_params(),
            motion: options.motion_params(),
            agents,
            options,
            attached: true,
        })
    }

    /// Recomputes every agent's acceleration from the current positions and
    /// velocities. Writes nothing but the acceleration column.
    pub fn run_acceleration_pass(&mut self, _delta_time: f32) -> Result<(), SimulationError> {
        self.ensure_attached()?;
        let _span = trace_span!("acceleration_pass", agents = self.agents.len()).entered();

        let AgentState {
            positions,
            velocities,
            accelerations,
            ..
        } = &mut self.agents;
        let positions: &[Vec2] = positions;
        let velocities: &[Vec2] = velocities;
        let params = &self.steering;

        accelerations
            .par_iter_mut()
            .enumerate()
            .with_min_len(MIN_AGENTS_PER_TASK)
            .for_each(|(index, out)| {
                *out = acceleration::acceleration(index, positions, velocities, params);
            });

        Ok(())
    }

    /// Integrates the accelerations from the last acceleration pass into
    /// velocity, position and rotation.
    pub fn run_move_pass(&mut self, delta_time: f32) -> Result<(), SimulationError> {
        self.ensure_attached()?;
        let _span = trace_span!("move_pass", agents = self.agents.len()).entered();

        let AgentState {
            positions,
            velocities,
            accelerations,
            rotations,
        } = &mut self.agents;
        let params = &self.motion;

        positions
            .par_iter_mut()
            .zip(velocities.par_iter_mut())
            .zip(rotations.par_iter_mut())
            .zip(accelerations.par_iter())
            .with_min_len(MIN_AGENTS_PER_TASK)
            .for_each(|(((position, velocity), rotation), acceleration)| {
                let moved = movement::integrate(
                    *acceleration,
                    *velocity,
                    *position,
                    *rotation,
                    delta_time,
                    params,
                );
                *position = moved.position;
                *velocity = moved.velocity;
                *rotation = moved.rotation;
            });

        Ok(())
    }

    /// One full tick: acceleration pass, then move pass.
    pub fn update(&mut self, delta_time: f32) -> Result<(), SimulationError> {
        self.run_acceleration_pass(delta_time)?;
        self.run_move_pass(delta_time)
    }

    /// Detaches the flock from its driver. Every later pass is rejected.
    pub fn teardown(&mut self) {
        if !self.attached {
            warn!("flock already torn down");
            return;
        }

        self.attached = false;
        info!(agents = self.agents.len(), "flock detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn view(&self) -> FlockView<'_> {
        FlockView {
            agents: &self.agents,
        }
    }

    pub fn agents(&self) -> &AgentState {
        &self.agents
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    pub fn summary(&self) -> FlockSummary {
        let speeds = self.agents.velocities().iter().map(|v| v.length());
        let (sum, min, max) = speeds.fold((0., f32::MAX, 0_f32), |(sum, min, max), s| {
            (sum + s, min.min(s), max.max(s))
        });

        let n = self.agents.len();
        if n == 0 {
            return FlockSummary {
                agents: 0,
                centroid: Vec2::ZERO,
                mean_speed: 0.,
                min_speed: 0.,
                max_speed: 0.,
            };
        }

        let centroid = self
            .agents
            .positions()
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + *p)
            / n as f32;

        FlockSummary {
            agents: n,
            centroid,
            mean_speed: sum / n as f32,
            min_speed: min,
            max_speed: max,
        }
    }

    fn ensure_attached(&self) -> Result<(), SimulationError> {
        if self.attached {
            Ok(())
        } else {
            warn!("pass rejected, flock is detached");
            Err(SimulationError::Detached)
        }
    }
}

impl<'a> FlockView<'a> {
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn positions(&self) -> &'a [Vec2] {
        self.agents.positions()
    }

    pub fn rotations(&self) -> &'a [f32] {
        self.agents.rotations()
    }

    pub fn rows(&self) -> impl Iterator<Item = AgentRow> + 'a {
        self.agents.rows()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::Flock;
    use crate::{agents::AgentState, error::SimulationError, options::SimulationOptions};

    fn pair() -> Flock {
        let agents = AgentState::from_kinematics(
            vec![Vec2::new(50., 50.), Vec2::new(51., 50.)],
            vec![Vec2::new(1., 0.), Vec2::new(-1., 0.)],
        )
        .unwrap();

        Flock::with_agents(SimulationOptions::default(), agents).unwrap()
    }

    #[test]
    fn rejects_invalid_options() {
        let mut options = SimulationOptions::default();
        options.minimum_velocity = 20.;

        assert!(matches!(
            Flock::new(options),
            Err(SimulationError::InvalidOptions(_))
        ));
    }

    #[test]
    fn acceleration_pass_leaves_kinematics_alone() {
        let mut flock = pair();
        let before = flock.agents().clone();

        flock.run_acceleration_pass(1.).unwrap();

        assert_eq!(flock.agents().positions(), before.positions());
        assert_eq!(flock.agents().velocities(), before.velocities());
        assert_eq!(flock.agents().rotations(), before.rotations());
        assert_ne!(flock.agents().accelerations(), before.accelerations());
    }

    #[test]
    fn move_pass_leaves_accelerations_alone() {
        let mut flock = pair();
        flock.run_acceleration_pass(1.).unwrap();
        let accelerations = flock.agents().accelerations().to_vec();

        flock.run_move_pass(1.).unwrap();

        assert_eq!(flock.agents().accelerations(), &accelerations[..]);
    }

    #[test]
    fn parallel_pass_matches_serial_kernel() {
        let mut options = SimulationOptions::default();
        options.init_agents = 300;
        options.seed = Some(3);
        let mut flock = Flock::new(options).unwrap();

        let positions = flock.agents().positions().to_vec();
        let velocities = flock.agents().velocities().to_vec();
        let params = flock.options().steering_params();

        flock.run_acceleration_pass(0.016).unwrap();

        for (i, acc) in flock.agents().accelerations().iter().enumerate() {
            let expected = crate::acceleration::acceleration(i, &positions, &velocities, &params);
            assert_eq!(*acc, expected);
        }
    }

    #[test]
    fn teardown_rejects_later_passes() {
        let mut flock = pair();
        flock.teardown();
        let before = flock.agents().clone();

        assert!(!flock.is_attached());
        assert!(matches!(flock.update(1.), Err(SimulationError::Detached)));
        assert!(matches!(
            flock.run_move_pass(1.),
            Err(SimulationError::Detached)
        ));
        assert_eq!(flock.agents(), &before);

        // second teardown is a no-op
        flock.teardown();
        assert!(!flock.is_attached());
    }

    #[test]
    fn view_exposes_positions_and_rotations() {
        let flock = pair();
        let view = flock.view();

        assert_eq!(view.len(), 2);
        assert_eq!(view.positions()[1], Vec2::new(51., 50.));
        assert_eq!(view.rotations().len(), 2);
        assert_eq!(view.rows().count(), 2);
    }

    #[test]
    fn summary_of_pair() {
        let summary = pair().summary();

        assert_eq!(summary.agents, 2);
        assert_eq!(summary.centroid, Vec2::new(50.5, 50.));
        assert_eq!(summary.mean_speed, 1.);
        assert_eq!(summary.min_speed, 1.);
        assert_eq!(summary.max_speed, 1.);
    }
}
