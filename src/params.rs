/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains all the
 * adjustable parameters for the boid simulation. The simulation core reads
 * them every substep; the tuning panel edits a copy and hands it back through
 * validation. It also provides slider ranges and change detection for the UI.
 */

use crate::error::SimulationError;

// Parameters for the simulation that can be adjusted via UI or config file
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParams {
    pub num_boids: usize,
    pub boid_mass: f32,
    pub min_velocity: f32,
    pub max_velocity: f32,

    // Regime thresholds, must be strictly increasing
    pub avoidance_range: f32,
    pub cohesion_range: f32,
    pub max_search_range: f32,

    pub avoidance_multiplier: f32,
    pub cohesion_multiplier: f32,
    pub gather_multiplier: f32,

    pub arena_radius: f32,
    // Scales boundary and obstacle responses
    pub force_multiplier: f32,
    // Fraction of max search range added to every obstacle radius
    pub obstacle_padding: f32,

    // Fixed timestep integration
    pub time_step: f32,
    pub substeps: usize,

    pub show_debug: bool,
    pub pause_simulation: bool,
    pub enable_parallel: bool,
}

// A snapshot of parameter values used for change detection
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSnapshot {
    num_boids: usize,
    boid_mass: f32,
    min_velocity: f32,
    max_velocity: f32,
    ranges: [f32; 3],
    multipliers: [f32; 3],
    arena_radius: f32,
    force_multiplier: f32,
    obstacle_padding: f32,
    time_step: f32,
    substeps: usize,
    show_debug: bool,
    enable_parallel: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_boids: 5,
            boid_mass: 0.01,
            min_velocity: 1.0,
            max_velocity: 15.0,
            avoidance_range: 0.2,
            cohesion_range: 0.4,
            max_search_range: 0.6,
            avoidance_multiplier: 3.0,
            cohesion_multiplier: 2.0,
            gather_multiplier: 2.5,
            arena_radius: 500.0,
            force_multiplier: 1.0,
            obstacle_padding: 0.3,
            time_step: 0.001,
            substeps: 16,
            show_debug: false,
            pause_simulation: false,
            enable_parallel: false,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), SimulationError> {
        let finite = [
            self.boid_mass,
            self.min_velocity,
            self.max_velocity,
            self.avoidance_range,
            self.cohesion_range,
            self.max_search_range,
            self.avoidance_multiplier,
            self.cohesion_multiplier,
            self.gather_multiplier,
            self.arena_radius,
            self.force_multiplier,
            self.obstacle_padding,
            self.time_step,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::InvalidConfig("parameters must be finite"));
        }
        if self.boid_mass <= 0.0 {
            return Err(SimulationError::InvalidConfig("boid mass must be positive"));
        }
        if self.avoidance_range <= 0.0
            || self.avoidance_range >= self.cohesion_range
            || self.cohesion_range >= self.max_search_range
        {
            return Err(SimulationError::RangesNotIncreasing {
                avoidance: self.avoidance_range,
                cohesion: self.cohesion_range,
                max_search: self.max_search_range,
            });
        }
        if self.min_velocity < 0.0 || self.min_velocity > self.max_velocity {
            return Err(SimulationError::InvalidConfig(
                "velocity bounds must satisfy 0 <= min <= max",
            ));
        }
        if self.arena_radius <= 0.0 {
            return Err(SimulationError::InvalidConfig("arena radius must be positive"));
        }
        if self.obstacle_padding < 0.0 {
            return Err(SimulationError::InvalidConfig("obstacle padding must not be negative"));
        }
        if self.time_step <= 0.0 {
            return Err(SimulationError::InvalidConfig("time step must be positive"));
        }
        if self.substeps == 0 {
            return Err(SimulationError::InvalidConfig("at least one substep is required"));
        }
        Ok(())
    }

    // Returns (num_boids_changed, any_param_changed) since `previous`
    pub fn detect_changes(&self, previous: &ParamSnapshot) -> (bool, bool) {
        let current = self.take_snapshot();
        (previous.num_boids != current.num_boids, *previous != current)
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            num_boids: self.num_boids,
            boid_mass: self.boid_mass,
            min_velocity: self.min_velocity,
            max_velocity: self.max_velocity,
            ranges: [self.avoidance_range, self.cohesion_range, self.max_search_range],
            multipliers: [
                self.avoidance_multiplier,
                self.cohesion_multiplier,
                self.gather_multiplier,
            ],
            arena_radius: self.arena_radius,
            force_multiplier: self.force_multiplier,
            obstacle_padding: self.obstacle_padding,
            time_step: self.time_step,
            substeps: self.substeps,
            show_debug: self.show_debug,
            enable_parallel: self.enable_parallel,
        }
    }

    // Get parameter ranges for UI sliders
    pub fn get_num_boids_range() -> std::ops::RangeInclusive<usize> {
        1..=2000
    }

    pub fn get_velocity_range() -> std::ops::RangeInclusive<f32> {
        0.0..=50.0
    }

    pub fn get_multiplier_range() -> std::ops::RangeInclusive<f32> {
        -10.0..=10.0
    }

    pub fn get_range_range() -> std::ops::RangeInclusive<f32> {
        0.01..=10.0
    }

    pub fn get_arena_range() -> std::ops::RangeInclusive<f32> {
        1.0..=1000.0
    }

    pub fn get_substeps_range() -> std::ops::RangeInclusive<usize> {
        1..=64
    }
}
