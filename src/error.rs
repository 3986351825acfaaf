/*
 * Error Module
 *
 * Typed errors for the simulation core and the configuration file layer.
 * Everything here is raised either at construction time or at a substep
 * boundary, never while forces are half accumulated.
 */

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("boid {id} has non-positive mass {mass}")]
    InvalidMass { id: u32, mass: f32 },
    #[error(
        "interaction ranges must be strictly increasing \
         (avoidance {avoidance}, cohesion {cohesion}, max search {max_search})"
    )]
    RangesNotIncreasing {
        avoidance: f32,
        cohesion: f32,
        max_search: f32,
    },
    #[error("response curve must contain at least one bucket")]
    EmptyCurve,
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("boid id {0} is used more than once")]
    DuplicateId(u32),
    #[error("boid {id} produced a non-finite position or velocity")]
    NonFinite { id: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}
