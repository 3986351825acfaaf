/*
 * Physics Module
 *
 * Boid-to-boid interaction. Every unordered pair is visited once and falls
 * into exactly one regime by distance:
 *
 *   avoidance  dist < avoidance_range                    push apart
 *   cohesion   avoidance_range <= dist < cohesion_range  match velocity
 *   gather     cohesion_range <= dist < max_search_range pull together
 *   none       dist >= max_search_range
 *
 * All three regimes scale by the same response curve, each remapping its own
 * distance ratio into a different slice of the curve's domain. The partner
 * always receives the exact negation of the force, so momentum is conserved.
 *
 * The search is exhaustive (O(n²)); there is no spatial index.
 */

use nannou::prelude::*;
use rayon::prelude::*;

use crate::boid::Boid;
use crate::curve::ResponseCurve;
use crate::params::SimulationParams;

// Curve domain slices for the two inner regimes
const AVOIDANCE_DOMAIN: f32 = 0.333;
const COHESION_DOMAIN: f32 = 0.666;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    Avoidance,
    Cohesion,
    Gather,
    None,
}

impl Regime {
    pub fn classify(dist: f32, params: &SimulationParams) -> Regime {
        if dist < params.avoidance_range {
            Regime::Avoidance
        } else if dist < params.cohesion_range {
            Regime::Cohesion
        } else if dist < params.max_search_range {
            Regime::Gather
        } else {
            Regime::None
        }
    }

    pub fn curve_ratio(self, dist: f32, params: &SimulationParams) -> Option<f32> {
        match self {
            Regime::Avoidance => Some(dist / params.avoidance_range * AVOIDANCE_DOMAIN),
            Regime::Cohesion => Some(dist / params.cohesion_range * COHESION_DOMAIN),
            Regime::Gather => Some(dist / params.max_search_range),
            Regime::None => None,
        }
    }
}

// Force on `boid`; coincident boids get no avoidance or gather term
pub fn pair_force(
    boid: &Boid,
    other: &Boid,
    params: &SimulationParams,
    curve: &ResponseCurve,
) -> Vec3 {
    let offset = other.position - boid.position;
    let dist = offset.length();
    let direction = if dist > 0.0 && dist.is_finite() {
        offset / dist
    } else {
        Vec3::ZERO
    };

    let regime = Regime::classify(dist, params);
    let response = match regime.curve_ratio(dist, params) {
        Some(ratio) => curve.evaluate(ratio),
        None => return Vec3::ZERO,
    };

    match regime {
        Regime::Avoidance => response * -direction * params.avoidance_multiplier,
        Regime::Cohesion => response * (other.velocity - boid.velocity) * params.cohesion_multiplier,
        Regime::Gather => response * direction * params.gather_multiplier,
        Regime::None => Vec3::ZERO,
    }
}

// The higher id of a pair is the one the force is computed for
fn canonical_force(
    a: &Boid,
    b: &Boid,
    params: &SimulationParams,
    curve: &ResponseCurve,
) -> (Vec3, Vec3) {
    if a.id() > b.id() {
        let force = pair_force(a, b, params, curve);
        (force, -force)
    } else {
        let force = pair_force(b, a, params, curve);
        (-force, force)
    }
}

pub fn pairwise_forces(boids: &[Boid], params: &SimulationParams, curve: &ResponseCurve) -> Vec<Vec3> {
    let mut forces = vec![Vec3::ZERO; boids.len()];
    for i in 0..boids.len() {
        for j in (i + 1)..boids.len() {
            let (on_i, on_j) = canonical_force(&boids[i], &boids[j], params, curve);
            forces[i] += on_i;
            forces[j] += on_j;
        }
    }
    forces
}

// Sequential accumulation: each pair i < j once, scattered into both boids
pub fn accumulate_pairwise(boids: &mut [Boid], params: &SimulationParams, curve: &ResponseCurve) {
    for i in 0..boids.len() {
        let (head, tail) = boids.split_at_mut(i + 1);
        let boid = &mut head[i];
        for other in tail.iter_mut() {
            let (on_boid, on_other) = canonical_force(boid, other, params, curve);
            boid.apply_force(on_boid);
            other.apply_force(on_other);
        }
    }
}

// Parallel accumulation: each worker gathers the forces on its own boids,
// always in canonical orientation, then a reduce applies them
pub fn accumulate_pairwise_parallel(
    boids: &mut [Boid],
    params: &SimulationParams,
    curve: &ResponseCurve,
) {
    let snapshot: &[Boid] = boids;
    let forces: Vec<Vec3> = snapshot
        .par_iter()
        .enumerate()
        .map(|(i, boid)| {
            let mut total = Vec3::ZERO;
            for (j, other) in snapshot.iter().enumerate() {
                if i != j {
                    total += canonical_force(boid, other, params, curve).0;
                }
            }
            total
        })
        .collect();

    // Reduce: every accumulator written exactly once
    boids
        .par_iter_mut()
        .zip(forces.into_par_iter())
        .for_each(|(boid, force)| boid.apply_force(force));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boid(id: u32, position: Vec3, velocity: Vec3) -> Boid {
        Boid::new(id, 1.0, position, velocity).unwrap()
    }

    #[test]
    fn regimes_partition_distance() {
        let params = SimulationParams::default();
        assert_eq!(Regime::classify(0.0, &params), Regime::Avoidance);
        assert_eq!(Regime::classify(0.19, &params), Regime::Avoidance);
        assert_eq!(Regime::classify(0.2, &params), Regime::Cohesion);
        assert_eq!(Regime::classify(0.39, &params), Regime::Cohesion);
        assert_eq!(Regime::classify(0.4, &params), Regime::Gather);
        assert_eq!(Regime::classify(0.59, &params), Regime::Gather);
        assert_eq!(Regime::classify(0.6, &params), Regime::None);
        assert_eq!(Regime::classify(100.0, &params), Regime::None);
    }

    #[test]
    fn each_regime_samples_its_own_slice() {
        let params = SimulationParams::default();
        let near = Regime::Avoidance.curve_ratio(0.1, &params).unwrap();
        assert!((near - 0.1665).abs() < 1e-6);
        let mid = Regime::Cohesion.curve_ratio(0.3, &params).unwrap();
        assert!((mid - 0.4995).abs() < 1e-6);
        let far = Regime::Gather.curve_ratio(0.5, &params).unwrap();
        assert!((far - 0.5 / 0.6).abs() < 1e-6);
        assert_eq!(Regime::None.curve_ratio(1.0, &params), None);
    }

    #[test]
    fn avoidance_pushes_pair_apart() {
        let params = SimulationParams {
            avoidance_range: 0.2,
            avoidance_multiplier: 3.0,
            ..SimulationParams::default()
        };
        let curve = ResponseCurve::constant(10, 1.0).unwrap();
        let mut boids = vec![
            boid(0, Vec3::ZERO, Vec3::ZERO),
            boid(1, vec3(0.1, 0.0, 0.0), Vec3::ZERO),
        ];

        accumulate_pairwise(&mut boids, &params, &curve);
        assert_eq!(boids[0].net_force(), vec3(-3.0, 0.0, 0.0));
        assert_eq!(boids[1].net_force(), vec3(3.0, 0.0, 0.0));
    }

    #[test]
    fn cohesion_matches_velocity() {
        let params = SimulationParams::default();
        let curve = ResponseCurve::constant(10, 0.5).unwrap();
        let slow = boid(0, Vec3::ZERO, vec3(1.0, 0.0, 0.0));
        let fast = boid(1, vec3(0.3, 0.0, 0.0), vec3(3.0, 0.0, 0.0));

        // Force on the higher id pulls it towards the slower partner's velocity
        let force = pair_force(&fast, &slow, &params, &curve);
        assert_eq!(force, vec3(-2.0, 0.0, 0.0));
    }

    #[test]
    fn gather_pulls_pair_together() {
        let params = SimulationParams::default();
        let curve = ResponseCurve::constant(10, 2.0).unwrap();
        let mut boids = vec![
            boid(0, Vec3::ZERO, Vec3::ZERO),
            boid(1, vec3(0.0, 0.5, 0.0), Vec3::ZERO),
        ];

        accumulate_pairwise(&mut boids, &params, &curve);
        assert_eq!(boids[0].net_force(), vec3(0.0, 5.0, 0.0));
        assert_eq!(boids[1].net_force(), vec3(0.0, -5.0, 0.0));
    }

    #[test]
    fn out_of_range_pairs_do_nothing() {
        let params = SimulationParams::default();
        let curve = ResponseCurve::default();
        let a = boid(0, Vec3::ZERO, Vec3::ZERO);
        let b = boid(1, vec3(0.6, 0.0, 0.0), vec3(5.0, 0.0, 0.0));
        assert_eq!(pair_force(&b, &a, &params, &curve), Vec3::ZERO);
    }

    #[test]
    fn coincident_boids_stay_finite() {
        let params = SimulationParams::default();
        let curve = ResponseCurve::default();
        let mut boids = vec![
            boid(0, Vec3::ONE, Vec3::ZERO),
            boid(1, Vec3::ONE, Vec3::X),
        ];
        accumulate_pairwise(&mut boids, &params, &curve);
        assert_eq!(boids[0].net_force(), Vec3::ZERO);
        assert_eq!(boids[1].net_force(), Vec3::ZERO);
    }

    #[test]
    fn orientation_follows_ids_not_storage_order() {
        let params = SimulationParams::default();
        let curve = ResponseCurve::constant(10, 1.0).unwrap();
        let mut forward = vec![
            boid(0, Vec3::ZERO, Vec3::ZERO),
            boid(1, vec3(0.1, 0.0, 0.0), Vec3::ZERO),
        ];
        let mut reversed = vec![forward[1].clone(), forward[0].clone()];

        accumulate_pairwise(&mut forward, &params, &curve);
        accumulate_pairwise(&mut reversed, &params, &curve);
        assert_eq!(forward[0].net_force(), reversed[1].net_force());
        assert_eq!(forward[1].net_force(), reversed[0].net_force());
    }

    #[test]
    fn parallel_matches_sequential() {
        let params = SimulationParams::default();
        let curve = ResponseCurve::smoothstep(32).unwrap();
        let positions = [
            vec3(0.0, 0.0, 0.0),
            vec3(0.15, 0.0, 0.0),
            vec3(0.0, 0.3, 0.1),
            vec3(-0.2, 0.2, -0.3),
            vec3(0.5, -0.1, 0.0),
            vec3(3.0, 3.0, 3.0),
        ];
        let boids: Vec<Boid> = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| boid(i as u32, p, vec3(i as f32, 1.0, -1.0)))
            .collect();

        let mut sequential = boids.clone();
        let mut parallel = boids.clone();
        accumulate_pairwise(&mut sequential, &params, &curve);
        accumulate_pairwise_parallel(&mut parallel, &params, &curve);

        let expected = pairwise_forces(&boids, &params, &curve);
        for ((s, p), e) in sequential.iter().zip(&parallel).zip(&expected) {
            assert!((s.net_force() - p.net_force()).length() < 1e-5);
            assert_eq!(s.net_force(), *e);
        }
    }
}
