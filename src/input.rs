/*
 * Input Module
 *
 * This module handles user input events for the boid simulation.
 *
 * Features:
 * - Camera panning with mouse drag and zooming with the wheel
 * - P toggles the tuning panel, Space pauses
 * - 1 toggles obstacle mode, Ctrl+S saves the configuration
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase};

use crate::app::{self, Model};

pub fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    let new_pos = Vec2::new(pos.x, pos.y);
    if model.camera.is_dragging() {
        model.camera.drag(new_pos, app.window_rect());
    }
    model.mouse_position = new_pos;
}

pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    // Clicks on the panel belong to egui
    if button == MouseButton::Left && !model.egui.ctx().is_pointer_over_area() {
        model.camera.start_drag(model.mouse_position, app.window_rect());
    }
}

pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.camera.end_drag();
    }
}

pub fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    let window_rect = app.window_rect();
    match delta {
        MouseScrollDelta::LineDelta(x, y) => {
            model.camera.zoom(vec2(x, y), model.mouse_position, window_rect);
        }
        MouseScrollDelta::PixelDelta(pos) => {
            model.camera.zoom(vec2(pos.x as f32, pos.y as f32) * 0.01, model.mouse_position, window_rect);
        }
    }
}

pub fn key_released(app: &App, model: &mut Model, key: Key) {
    match key {
        Key::P => model.show_panel = !model.show_panel,
        Key::Space => model.params.pause_simulation = !model.params.pause_simulation,
        Key::Key1 => model.simulation.toggle_obstacle_mode(),
        Key::S if app.keys.mods.ctrl() => app::save_config(model),
        Key::F => model.camera.fit_arena(model.simulation.params().arena_radius, app.window_rect()),
        _ => {}
    }
}

// Pass events to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
