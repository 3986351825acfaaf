/*
 * Application Module
 *
 * This module defines the main application model and per-frame logic. It
 * loads the configuration, builds the simulation, applies tuning panel edits
 * between steps and advances the simulation once per rendered frame.
 */

use std::path::PathBuf;
use std::time::Instant;

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{error, info, warn};

use crate::camera::Camera;
use crate::config::{self, LoadedConfig};
use crate::debug::DebugInfo;
use crate::obstacle::Obstacle;
use crate::params::SimulationParams;
use crate::simulation::Simulation;
use crate::{input, renderer, ui};

// Environment variable overriding the config file location
pub const CONFIG_PATH_VAR: &str = "BOID_CONFIG";

// Main model for the application
pub struct Model {
    pub simulation: Simulation,
    // Copy edited by the tuning panel, pushed to the simulation when valid
    pub params: SimulationParams,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
    pub show_panel: bool,
    pub config_path: PathBuf,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    // Size the window at 80% of the monitor, if there is one to ask
    let (window_width, window_height) = app
        .primary_monitor()
        .map(|monitor| {
            let size = monitor.size();
            (size.width as f32 * 0.8, size.height as f32 * 0.8)
        })
        .unwrap_or((1280.0, 800.0));

    let window_id = app
        .new_window()
        .title("Boid Arena")
        .size(window_width as u32, window_height as u32)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .key_released(input::key_released)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to build the main window");

    let window = app.window(window_id).expect("main window closed during setup");
    let egui = Egui::from_window(&window);

    let config_path = std::env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let loaded = match config::load_config(&config_path) {
        Ok(loaded) => loaded,
        Err(err) => {
            warn!(path = %config_path.display(), %err, "Using default configuration");
            LoadedConfig {
                params: SimulationParams::default(),
                curve: None,
            }
        }
    };

    let simulation = build_simulation(loaded);
    let params = simulation.params().clone();

    let mut camera = Camera::new();
    camera.fit_arena(params.arena_radius, window.rect());

    Model {
        simulation,
        params,
        egui,
        debug_info: DebugInfo::default(),
        camera,
        mouse_position: Vec2::ZERO,
        show_panel: true,
        config_path,
    }
}

fn build_simulation(loaded: LoadedConfig) -> Simulation {
    let curve = loaded.response_curve();
    let mut rng = rand::thread_rng();

    let mut simulation = match Simulation::with_random_flock(loaded.params, curve.clone(), &mut rng) {
        Ok(simulation) => simulation,
        Err(err) => {
            warn!(%err, "Configured parameters rejected, falling back to defaults");
            match Simulation::with_random_flock(SimulationParams::default(), curve, &mut rng) {
                Ok(simulation) => simulation,
                Err(err) => panic!("default parameters must be valid: {}", err),
            }
        }
    };

    let column = Obstacle::reference_column(simulation.params());
    simulation.add_obstacle(column);
    simulation
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let actions = if model.show_panel {
        let obstacle_mode = model.simulation.obstacle_mode();
        ui::update_ui(
            &mut model.egui,
            &mut model.params,
            model.simulation.curve_mut(),
            &model.debug_info,
            obstacle_mode,
        )
    } else {
        // Keep egui's frame cycle going with the panel hidden
        let _ = model.egui.begin_frame();
        ui::UiActions::default()
    };

    apply_ui_actions(model, &actions);

    if !model.params.pause_simulation {
        let start = Instant::now();
        match model.simulation.step() {
            Ok(()) => model.debug_info.status = None,
            Err(err) => {
                error!(%err, frame = model.simulation.frames(), "Simulation step failed, pausing");
                model.debug_info.status = Some(format!("Paused: {}", err));
                model.params.pause_simulation = true;
            }
        }
        model.debug_info.step_time = start.elapsed();
        model.debug_info.frames_simulated = model.simulation.frames();
    }
}

fn apply_ui_actions(model: &mut Model, actions: &ui::UiActions) {
    let mut rng = rand::thread_rng();

    if actions.params_changed || actions.num_boids_changed {
        if let Err(err) = model.simulation.retune(model.params.clone(), &mut rng) {
            model.debug_info.status = Some(format!("Rejected: {}", err));
        }
    }

    if actions.reset_boids {
        if let Err(err) = model.simulation.reset_flock(&mut rng) {
            warn!(%err, "Could not reset flock");
        }
    }

    if actions.toggle_obstacles {
        model.simulation.toggle_obstacle_mode();
    }

    if let Some(preset) = actions.curve_preset {
        let bucket_count = model.simulation.curve().bucket_count();
        if let Some(curve) = preset.build(bucket_count) {
            *model.simulation.curve_mut() = curve;
        }
    }

    if actions.save_config {
        save_config(model);
    }
}

pub fn save_config(model: &mut Model) {
    let result = config::save_config(
        &model.config_path,
        model.simulation.params(),
        model.simulation.curve(),
    );
    model.debug_info.status = Some(match result {
        Ok(()) => {
            info!(path = %model.config_path.display(), "Configuration saved");
            "Config saved".to_string()
        }
        Err(err) => {
            error!(%err, "Configuration save failed");
            format!("Save failed: {}", err)
        }
    });
}
