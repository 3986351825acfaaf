/*
 * Boid Arena - Module Definitions
 *
 * This file defines the module structure for the boid simulation. The
 * simulation core (curve, boid, obstacle, physics, simulation) has no
 * dependency on the window; the nannou front end drives it.
 */

// Re-export key components for easier access
pub use app::Model;
pub use boid::Boid;
pub use camera::Camera;
pub use config::{load_config, save_config, LoadedConfig};
pub use curve::ResponseCurve;
pub use debug::DebugInfo;
pub use error::{ConfigError, SimulationError};
pub use frame::OrientationFrame;
pub use obstacle::Obstacle;
pub use params::SimulationParams;
pub use physics::Regime;
pub use simulation::Simulation;

// Simulation core
pub mod boid;
pub mod config;
pub mod curve;
pub mod error;
pub mod frame;
pub mod obstacle;
pub mod params;
pub mod physics;
pub mod simulation;

// Front end
pub mod app;
pub mod camera;
pub mod debug;
pub mod input;
pub mod renderer;
pub mod ui;

// Boid triangle size on screen, in pixels
pub const BOID_SIZE: f32 = 6.0;
