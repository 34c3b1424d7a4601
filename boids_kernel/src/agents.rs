use std::f32::consts::TAU;

use glam::Vec2;
use itertools::izip;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    error::SimulationError,
    math_helpers::heading,
    options::{InitiationStrategy, SimulationOptions},
};

/// Columnar kinematic state of a fixed-size population.
///
/// Index `i` in every column belongs to agent `i`; the columns always have the
/// same length and that length never changes for the lifetime of the state.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub(crate) positions: Vec<Vec2>,
    pub(crate) velocities: Vec<Vec2>,
    pub(crate) accelerations: Vec<Vec2>,
    pub(crate) rotations: Vec<f32>,
}

/// One agent's row, as seen by presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentRow {
    pub id: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
}

impl AgentState {
    /// Builds a population from caller supplied positions and velocities.
    pub fn from_kinematics(
        positions: Vec<Vec2>,
        velocities: Vec<Vec2>,
    ) -> Result<Self, SimulationError> {
        if positions.len() != velocities.len() {
            return Err(SimulationError::PopulationMismatch {
                positions: positions.len(),
                velocities: velocities.len(),
            });
        }

        let len = positions.len();
        let rotations = velocities.iter().map(|v| heading(*v)).collect();

        Ok(AgentState {
            positions,
            velocities,
            accelerations: vec![Vec2::ZERO; len],
            rotations,
        })
    }

    /// Places `options.init_agents` agents according to the configured
    /// initiation strategy.
    pub fn seeded(options: &SimulationOptions) -> Self {
        let mut rng = match options.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        let (positions, velocities): (Vec<Vec2>, Vec<Vec2>) = (0..options.init_agents)
            .map(|_| get_agent(options, &mut rng))
            .unzip();

        let len = positions.len();
        let rotations = velocities.iter().map(|v| heading(*v)).collect();

        AgentState {
            positions,
            velocities,
            accelerations: vec![Vec2::ZERO; len],
            rotations,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    pub fn accelerations(&self) -> &[Vec2] {
        &self.accelerations
    }

    pub fn rotations(&self) -> &[f32] {
        &self.rotations
    }

    pub fn rows(&self) -> impl Iterator<Item = AgentRow> + '_ {
        izip!(&self.positions, &self.velocities, &self.rotations)
            .enumerate()
            .map(|(id, (position, velocity, rotation))| AgentRow {
                id,
                position: *position,
                velocity: *velocity,
                rotation: *rotation,
            })
    }
}

fn get_agent<R: Rng>(options: &SimulationOptions, rng: &mut R) -> (Vec2, Vec2) {
    let speed = rng.gen_range(options.minimum_velocity..=options.maximum_velocity);
    let angle = rng.gen_range(0.0..TAU);
    let direction = Vec2::new(angle.cos(), angle.sin());

    match options.initiation_strat {
        InitiationStrategy::RandomRandom => {
            // x, y in [0, area_size)
            let x = rng.gen::<f32>() * options.area_size;
            let y = rng.gen::<f32>() * options.area_size;

            (Vec2::new(x, y), direction * speed)
        }
        InitiationStrategy::CircleCircumferenceIn => {
            let half = options.area_size / 2.;
            let centre = Vec2::new(half, half);
            let init_pos: f32 = rng.gen::<f32>() / 3. + 2. / 3.;

            (centre + direction * (half * init_pos), direction * -speed)
        }
    }
}
