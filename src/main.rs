/*
 * Boid Arena
 *
 * Simulates a flock of boids inside a spherical arena. Each pair of boids
 * avoids, coheres or gathers depending on distance, scaled by a tunable
 * response curve. An optional obstacle column deflects boids on a collision
 * course.
 *
 * Controls: drag to pan, scroll to zoom, P toggles the panel, Space pauses,
 * 1 toggles obstacles, F refits the view and Ctrl+S saves the configuration.
 * Log verbosity follows RUST_LOG (default "info").
 */

use boid_arena::app;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    nannou::app(app::model).update(app::update).run();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
