/*
 * Boid Module
 *
 * This module defines the Boid struct: one agent's physical state plus the
 * force accumulator that the interaction passes write into during a substep.
 *
 * Each substep a boid:
 * 1. Receives forces (boundary, obstacle, pairwise) into its accumulator
 * 2. Integrates once with semi-implicit Euler and a hard speed clamp
 * 3. Remembers the force it integrated and clears the accumulator
 */

use nannou::prelude::*;

use crate::error::SimulationError;

#[derive(Clone, Debug, PartialEq)]
pub struct Boid {
    id: u32,
    mass: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    net_force: Vec3,
    last_force: Vec3,
}

impl Boid {
    pub fn new(id: u32, mass: f32, position: Vec3, velocity: Vec3) -> Result<Self, SimulationError> {
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(SimulationError::InvalidMass { id, mass });
        }

        Ok(Self {
            id,
            mass,
            position,
            velocity,
            net_force: Vec3::ZERO,
            last_force: Vec3::ZERO,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn net_force(&self) -> Vec3 {
        self.net_force
    }

    // Display only
    pub fn last_force(&self) -> Vec3 {
        self.last_force
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: Vec3) {
        self.net_force += force;
    }

    // Zero inside the arena. Outside, radial restoring plus tangential velocity,
    // both scaled by penetration depth
    pub fn boundary_force(&self, arena_radius: f32, force_multiplier: f32) -> Vec3 {
        let dist = self.position.length();
        if dist < arena_radius || dist <= 0.0 {
            return Vec3::ZERO;
        }

        let normal = self.position / dist;
        let tangential = self.velocity - self.velocity.dot(normal) * normal;
        (tangential - normal) * (dist - arena_radius) * force_multiplier
    }

    pub fn apply_boundary_force(&mut self, arena_radius: f32, force_multiplier: f32) {
        let force = self.boundary_force(arena_radius, force_multiplier);
        self.apply_force(force);
    }

    // Advance one fixed substep and reset the accumulator
    pub fn integrate(&mut self, dt: f32, min_velocity: f32, max_velocity: f32) {
        let acceleration = self.net_force / self.mass;
        let velocity = self.velocity + acceleration * dt;

        self.velocity = clamp_speed(velocity, self.velocity, min_velocity, max_velocity);
        self.position += self.velocity * dt;

        self.last_force = self.net_force;
        self.net_force = Vec3::ZERO;
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

// Zero velocity borrows the previous direction, or +X
pub fn clamp_speed(velocity: Vec3, previous: Vec3, min_speed: f32, max_speed: f32) -> Vec3 {
    let speed = velocity.length();

    if speed < min_speed {
        direction_or_fallback(velocity, speed, previous) * min_speed
    } else if speed > max_speed {
        direction_or_fallback(velocity, speed, previous) * max_speed
    } else {
        velocity
    }
}

fn direction_or_fallback(velocity: Vec3, speed: f32, previous: Vec3) -> Vec3 {
    if speed > 0.0 && speed.is_finite() {
        return velocity / speed;
    }
    if let Some(direction) = overflowed_direction(velocity) {
        return direction;
    }
    let previous_speed = previous.length();
    if previous_speed > 0.0 && previous_speed.is_finite() {
        previous / previous_speed
    } else {
        Vec3::X
    }
}

// Direction of a vector whose length overflowed f32
fn overflowed_direction(velocity: Vec3) -> Option<Vec3> {
    if velocity.is_nan() {
        return None;
    }
    let scaled = if velocity.is_finite() {
        velocity / velocity.abs().max_element()
    } else {
        // Infinite components dominate everything finite
        let dominant = |v: f32| if v.is_infinite() { v.signum() } else { 0.0 };
        vec3(dominant(velocity.x), dominant(velocity.y), dominant(velocity.z))
    };
    let length = scaled.length();
    if length > 0.0 && length.is_finite() {
        Some(scaled / length)
    } else {
        None
    }
}
