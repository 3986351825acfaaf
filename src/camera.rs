/*
 * Camera Module
 *
 * This module defines the Camera struct that handles zooming and panning
 * of the top-down (XY) view of the arena. It provides coordinate
 * transformations between world space and screen space.
 */

use nannou::prelude::*;

pub struct Camera {
    // World point at the window centre
    pub position: Vec2,
    // Screen pixels per world unit
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    // World point held under the cursor while dragging
    grab: Option<Vec2>,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.01,
            max_zoom: 1000.0,
            grab: None,
        }
    }

    // Centre on the origin with the whole arena in view
    pub fn fit_arena(&mut self, arena_radius: f32, window_rect: Rect) {
        let half_extent = window_rect.w().min(window_rect.h()) * 0.5;
        self.position = Vec2::ZERO;
        if arena_radius > 0.0 {
            self.zoom = (half_extent * 0.9 / arena_radius).clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn world_to_screen(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        window_rect.xy() + (point - self.position) * self.zoom
    }

    pub fn screen_to_world(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        self.position + (point - window_rect.xy()) / self.zoom
    }

    // Move the camera so `world` sits under the screen point `screen`
    fn pin(&mut self, world: Vec2, screen: Vec2, window_rect: Rect) {
        self.position = world - (screen - window_rect.xy()) / self.zoom;
    }

    // Exponential zoom about the cursor, one notch is about 10%
    pub fn zoom(&mut self, scroll_delta: Vec2, cursor_position: Vec2, window_rect: Rect) {
        let anchor = self.screen_to_world(cursor_position, window_rect);
        self.zoom = (self.zoom * (scroll_delta.y * 0.1).exp()).clamp(self.min_zoom, self.max_zoom);
        self.pin(anchor, cursor_position, window_rect);
    }

    pub fn start_drag(&mut self, cursor_position: Vec2, window_rect: Rect) {
        self.grab = Some(self.screen_to_world(cursor_position, window_rect));
    }

    pub fn drag(&mut self, cursor_position: Vec2, window_rect: Rect) {
        if let Some(grab) = self.grab {
            self.pin(grab, cursor_position, window_rect);
        }
    }

    pub fn end_drag(&mut self) {
        self.grab = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
