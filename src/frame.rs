/*
 * Orientation Frame Module
 *
 * Display-only helper for the renderer: builds an orthonormal frame for a
 * boid from its velocity and the force it last integrated, banking the body
 * into turns. Nothing in the simulation reads it.
 */

use nannou::prelude::*;

// Up hint the frame banks against
pub fn gravity() -> Vec3 {
    vec3(0.0, 9.81, 0.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationFrame {
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

impl OrientationFrame {
    pub fn from_motion(velocity: Vec3, last_force: Vec3) -> Self {
        let tangent = normalize_or(velocity, Vec3::X);

        let up = normalize_or(gravity() + last_force, Vec3::Y);
        let mut binormal = up.cross(tangent);
        if !(binormal.length_squared() > 1e-12) {
            binormal = least_aligned_axis(tangent).cross(tangent);
        }
        let binormal = binormal.normalize();
        let normal = binormal.cross(tangent).normalize();
        let binormal = tangent.cross(normal).normalize();

        Self { tangent, normal, binormal }
    }

    pub fn heading(&self) -> f32 {
        self.tangent.y.atan2(self.tangent.x)
    }
}

fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let len = v.length();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

fn least_aligned_axis(v: Vec3) -> Vec3 {
    let a = v.abs();
    if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    }
}
