/*
 * UI Module
 *
 * This module contains the tuning panel built with nannou_egui. It edits a
 * copy of the simulation parameters and the response curve samples; the app
 * applies the results between simulation steps.
 */

use nannou_egui::{egui, Egui};

use crate::curve::ResponseCurve;
use crate::debug::DebugInfo;
use crate::params::SimulationParams;

// What the user asked for this frame
#[derive(Default)]
pub struct UiActions {
    pub reset_boids: bool,
    pub num_boids_changed: bool,
    pub params_changed: bool,
    pub toggle_obstacles: bool,
    pub save_config: bool,
    pub curve_preset: Option<CurvePreset>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurvePreset {
    Flat,
    Smoothstep,
}

impl CurvePreset {
    pub fn build(self, bucket_count: usize) -> Option<ResponseCurve> {
        match self {
            CurvePreset::Flat => ResponseCurve::constant(bucket_count, 1.0).ok(),
            CurvePreset::Smoothstep => ResponseCurve::smoothstep(bucket_count).ok(),
        }
    }
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    curve: &mut ResponseCurve,
    debug_info: &DebugInfo,
    obstacle_mode: bool,
) -> UiActions {
    let mut actions = UiActions::default();

    // Take a snapshot of current parameter values for change detection
    let snapshot = params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.num_boids, SimulationParams::get_num_boids_range())
                        .text("Number of Boids"),
                );
                if ui.button("Reset Boids").clicked() {
                    actions.reset_boids = true;
                }
                ui.add(
                    egui::Slider::new(&mut params.min_velocity, SimulationParams::get_velocity_range())
                        .text("Min Velocity"),
                );
                ui.add(
                    egui::Slider::new(&mut params.max_velocity, SimulationParams::get_velocity_range())
                        .text("Max Velocity"),
                );
            });

            ui.collapsing("Interaction Ranges", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.avoidance_range, SimulationParams::get_range_range())
                        .text("Avoidance Range"),
                );
                ui.add(
                    egui::Slider::new(&mut params.cohesion_range, SimulationParams::get_range_range())
                        .text("Cohesion Range"),
                );
                ui.add(
                    egui::Slider::new(&mut params.max_search_range, SimulationParams::get_range_range())
                        .text("Max Search Range"),
                );
            });

            ui.collapsing("Force Multipliers", |ui| {
                let range = SimulationParams::get_multiplier_range;
                ui.add(egui::Slider::new(&mut params.avoidance_multiplier, range()).text("Avoidance"));
                ui.add(egui::Slider::new(&mut params.cohesion_multiplier, range()).text("Cohesion"));
                ui.add(egui::Slider::new(&mut params.gather_multiplier, range()).text("Gather"));
                ui.add(egui::Slider::new(&mut params.force_multiplier, range()).text("Boundary/Obstacle"));
            });

            ui.collapsing("Arena", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.arena_radius, SimulationParams::get_arena_range())
                        .text("Arena Radius"),
                );
                ui.add(
                    egui::Slider::new(&mut params.substeps, SimulationParams::get_substeps_range())
                        .text("Substeps per Frame"),
                );
                if ui.button(if obstacle_mode { "Disable Obstacles" } else { "Enable Obstacles" }).clicked() {
                    actions.toggle_obstacles = true;
                }
            });

            ui.collapsing("Response Curve", |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Flat").clicked() {
                        actions.curve_preset = Some(CurvePreset::Flat);
                    }
                    if ui.button("Smoothstep").clicked() {
                        actions.curve_preset = Some(CurvePreset::Smoothstep);
                    }
                });
                ui.label(format!("{} buckets", curve.bucket_count()));
                egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                    for (i, sample) in curve.samples_mut().iter_mut().enumerate() {
                        ui.add(egui::Slider::new(sample, 0.0..=5.0).text(format!("#{}", i)));
                    }
                });
            });

            ui.collapsing("Performance", |ui| {
                ui.checkbox(&mut params.enable_parallel, "Enable Parallel Processing");
                ui.separator();
                for line in debug_info.lines(params.num_boids, obstacle_mode) {
                    ui.label(line);
                }
            });

            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
            if ui.button("Save Config").clicked() {
                actions.save_config = true;
            }
        });

    let (num_boids_changed, params_changed) = params.detect_changes(&snapshot);
    actions.num_boids_changed = num_boids_changed;
    actions.params_changed = params_changed;
    actions
}
