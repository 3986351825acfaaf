/*
 * Obstacle Module
 *
 * Capped cylinders the flock steers around. Collision prediction ignores the
 * caps and the axial extent: the boid's motion is projected onto the XY
 * plane (obstacle axes are taken to be parallel to Z) and intersected with
 * a circle of the padded radius around the obstacle's midpoint.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::params::SimulationParams;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    pub fn reference_column(params: &SimulationParams) -> Self {
        Self {
            start: vec3(0.0, 0.0, params.arena_radius),
            end: vec3(0.0, 0.0, -params.arena_radius),
            radius: params.max_search_range * 0.7,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    pub fn effective_radius(&self, params: &SimulationParams) -> f32 {
        self.radius + params.obstacle_padding * params.max_search_range
    }

    pub fn collision_force(&self, boid: &Boid, params: &SimulationParams) -> Option<Vec3> {
        let center = self.center().truncate();
        let relative = boid.position.truncate() - center;
        let t = time_of_impact(relative, boid.velocity.truncate(), self.effective_radius(params))?;

        let intersect = boid.position + boid.velocity * t;
        let outward = (intersect.truncate() - center).extend(0.0);
        let outward_len = outward.length();
        if !(outward_len > 0.0) {
            return None;
        }
        let normal = outward / outward_len;

        let mut force = normal * params.force_multiplier;

        // Heading straight at the axis leaves no tangential direction
        let tangent = boid.velocity - boid.velocity.dot(normal) * normal;
        let tangent_len = tangent.length();
        if tangent_len > 0.0 && tangent_len.is_finite() {
            force += tangent / tangent_len * params.force_multiplier;
        }

        Some(force)
    }

    pub fn apply_collision_force(&self, boid: &mut Boid, params: &SimulationParams) {
        if let Some(force) = self.collision_force(boid, params) {
            boid.apply_force(force);
        }
    }
}

// Smallest root of |p + t·v|² = r², only if strictly in the future
pub fn time_of_impact(relative_position: Vec2, velocity: Vec2, radius: f32) -> Option<f32> {
    let a = velocity.dot(velocity);
    if !(a > 0.0) {
        return None;
    }
    let b = 2.0 * velocity.dot(relative_position);
    let c = relative_position.dot(relative_position) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    let t = if discriminant < 0.0 {
        return None;
    } else if discriminant == 0.0 {
        -b / (2.0 * a)
    } else {
        let root = discriminant.sqrt();
        let t1 = (-b - root) / (2.0 * a);
        let t2 = (-b + root) / (2.0 * a);
        t1.min(t2)
    };

    if t > 0.0 && t.is_finite() {
        Some(t)
    } else {
        None
    }
}
