/*
 * Renderer Module
 *
 * This module handles the rendering of the boid simulation as a top-down
 * view of the XY plane. It draws the arena boundary, the obstacles when
 * obstacle mode is on, the boids and the debug overlay.
 */

use nannou::prelude::*;
use tracing::error;

use crate::app::Model;
use crate::frame::OrientationFrame;
use crate::BOID_SIZE;

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let camera = &model.camera;
    let params = model.simulation.params();

    // Arena boundary, the sphere's equator
    let centre = camera.world_to_screen(Vec2::ZERO, window_rect);
    draw.ellipse()
        .xy(centre)
        .radius(params.arena_radius * camera.zoom)
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.3, 0.3, 0.3, 1.0));

    if model.simulation.obstacle_mode() {
        for obstacle in model.simulation.obstacles() {
            let screen = camera.world_to_screen(obstacle.center().truncate(), window_rect);
            draw.ellipse()
                .xy(screen)
                .radius(obstacle.radius * camera.zoom)
                .color(rgba(0.5, 0.2, 0.2, 0.8));
            // Padded radius the deflection actually tests against
            draw.ellipse()
                .xy(screen)
                .radius(obstacle.effective_radius(params) * camera.zoom)
                .no_fill()
                .stroke_weight(1.0)
                .stroke(rgba(1.0, 0.5, 0.0, 0.7));
        }
    }

    for boid in model.simulation.boids() {
        let screen = camera.world_to_screen(boid.position.truncate(), window_rect);
        if !window_rect.pad(-BOID_SIZE * 2.0).contains(screen) {
            continue;
        }

        let heading = OrientationFrame::from_motion(boid.velocity, boid.last_force()).heading();
        let points = [
            pt2(BOID_SIZE, 0.0),
            pt2(-BOID_SIZE * 0.6, BOID_SIZE * 0.5),
            pt2(-BOID_SIZE * 0.6, -BOID_SIZE * 0.5),
        ];
        draw.polygon()
            .color(rgb(0.86, 0.86, 0.86))
            .points(points)
            .xy(screen)
            .rotate(heading);
    }

    // Panel copy, so the toggle works even while an edit is rejected
    if model.params.show_debug {
        if let Some(first) = model.simulation.boids().first() {
            let screen = camera.world_to_screen(first.position.truncate(), window_rect);
            for (radius, color) in [
                (params.avoidance_range, RED),
                (params.cohesion_range, GREEN),
                (params.max_search_range, BLUE),
            ] {
                draw.ellipse()
                    .xy(screen)
                    .radius(radius * camera.zoom)
                    .no_fill()
                    .stroke(color)
                    .stroke_weight(1.0);
            }
            let tip = screen + first.velocity.truncate() * camera.zoom;
            draw.arrow().start(screen).end(tip).color(YELLOW).stroke_weight(2.0);
        }

        let lines = model
            .debug_info
            .lines(model.simulation.boids().len(), model.simulation.obstacle_mode());
        let text_x = window_rect.right() - 120.0;
        let mut text_y = window_rect.top() - 20.0;
        for line in lines {
            draw.text(&line)
                .x_y(text_x, text_y)
                .w(220.0)
                .left_justify()
                .color(WHITE)
                .font_size(14);
            text_y -= 20.0;
        }
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        error!(?err, "Failed to draw frame");
    }

    if model.show_panel {
        if let Err(err) = model.egui.draw_to_frame(&frame) {
            error!(?err, "Failed to draw tuning panel");
        }
    }
}
