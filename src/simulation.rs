/*
 * Simulation Module
 *
 * The Simulation owns the flock, the obstacles, the response curve and the
 * parameters, and advances them one rendered frame at a time. A frame runs a
 * fixed number of substeps; each substep is strictly phased:
 *
 * 1. Boundary force for every boid
 * 2. Obstacle deflection for every boid x obstacle (obstacle mode only)
 * 3. Pairwise interaction for every unordered pair
 * 4. Integration for every boid
 *
 * No boid integrates until every force of the substep has been accumulated.
 * Tuning edits (curve samples, parameters) need `&mut self`, so they can
 * only land between steps and a step always sees one consistent snapshot.
 */

use nannou::prelude::*;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::boid::Boid;
use crate::curve::ResponseCurve;
use crate::error::SimulationError;
use crate::obstacle::Obstacle;
use crate::params::SimulationParams;
use crate::physics;

pub struct Simulation {
    boids: Vec<Boid>,
    obstacles: Vec<Obstacle>,
    curve: ResponseCurve,
    params: SimulationParams,
    obstacle_mode: bool,
    next_id: u32,
    frames: u64,
}

impl Simulation {
    pub fn new(
        params: SimulationParams,
        curve: ResponseCurve,
        mut boids: Vec<Boid>,
        obstacles: Vec<Obstacle>,
    ) -> Result<Self, SimulationError> {
        params.validate()?;

        boids.sort_by_key(Boid::id);
        if let Some(pair) = boids.windows(2).find(|pair| pair[0].id() == pair[1].id()) {
            return Err(SimulationError::DuplicateId(pair[0].id()));
        }
        let next_id = boids.last().map_or(0, |boid| boid.id() + 1);

        info!(
            boids = boids.len(),
            obstacles = obstacles.len(),
            buckets = curve.bucket_count(),
            "Created simulation"
        );

        Ok(Self {
            boids,
            obstacles,
            curve,
            params,
            obstacle_mode: false,
            next_id,
            frames: 0,
        })
    }

    // Boids spawn in the arena's bounding cube, drifting at up to min speed per axis
    pub fn with_random_flock<R: Rng>(
        params: SimulationParams,
        curve: ResponseCurve,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        let boids = random_flock(&params, 0, rng)?;
        Self::new(params, curve, boids, Vec::new())
    }

    // Replace every boid; ids continue from the last one handed out
    pub fn reset_flock<R: Rng>(&mut self, rng: &mut R) -> Result<(), SimulationError> {
        let boids = random_flock(&self.params, self.next_id, rng)?;
        self.next_id += boids.len() as u32;
        self.boids = boids;
        debug!(boids = self.boids.len(), next_id = self.next_id, "Reset flock");
        Ok(())
    }

    // Stops at the first substep that leaves a boid non-finite
    pub fn step(&mut self) -> Result<(), SimulationError> {
        for _ in 0..self.params.substeps {
            self.substep()?;
        }
        self.frames += 1;
        Ok(())
    }

    fn substep(&mut self) -> Result<(), SimulationError> {
        self.accumulate_forces();
        self.integrate();

        match self.boids.iter().find(|boid| !boid.is_finite()) {
            Some(boid) => Err(SimulationError::NonFinite { id: boid.id() }),
            None => Ok(()),
        }
    }

    fn accumulate_forces(&mut self) {
        let params = &self.params;
        let obstacles: &[Obstacle] = if self.obstacle_mode { &self.obstacles } else { &[] };

        let external = |boid: &mut Boid| {
            boid.apply_boundary_force(params.arena_radius, params.force_multiplier);
            for obstacle in obstacles {
                obstacle.apply_collision_force(boid, params);
            }
        };

        if params.enable_parallel {
            let chunk_size = self.chunk_size();
            self.boids
                .par_chunks_mut(chunk_size)
                .for_each(|chunk| chunk.iter_mut().for_each(external));
            physics::accumulate_pairwise_parallel(&mut self.boids, params, &self.curve);
        } else {
            self.boids.iter_mut().for_each(external);
            physics::accumulate_pairwise(&mut self.boids, params, &self.curve);
        }
    }

    fn integrate(&mut self) {
        let dt = self.params.time_step;
        let min_velocity = self.params.min_velocity;
        let max_velocity = self.params.max_velocity;

        if self.params.enable_parallel {
            let chunk_size = self.chunk_size();
            self.boids.par_chunks_mut(chunk_size).for_each(|chunk| {
                for boid in chunk {
                    boid.integrate(dt, min_velocity, max_velocity);
                }
            });
        } else {
            for boid in &mut self.boids {
                boid.integrate(dt, min_velocity, max_velocity);
            }
        }
    }

    // Process boids in chunks to reduce synchronization overhead
    fn chunk_size(&self) -> usize {
        std::cmp::max(self.boids.len() / rayon::current_num_threads(), 1)
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacle_mode(&self) -> bool {
        self.obstacle_mode
    }

    pub fn set_obstacle_mode(&mut self, enabled: bool) {
        if enabled != self.obstacle_mode {
            info!(enabled, "Obstacle mode changed");
        }
        self.obstacle_mode = enabled;
    }

    pub fn toggle_obstacle_mode(&mut self) {
        self.set_obstacle_mode(!self.obstacle_mode);
    }

    pub fn curve(&self) -> &ResponseCurve {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut ResponseCurve {
        &mut self.curve
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SimulationParams) -> Result<(), SimulationError> {
        if let Err(err) = params.validate() {
            warn!(%err, "Rejected parameter update");
            return Err(err);
        }
        self.params = params;
        Ok(())
    }

    // Accepted updates that change the boid count respawn the flock
    pub fn retune<R: Rng>(&mut self, params: SimulationParams, rng: &mut R) -> Result<(), SimulationError> {
        let respawn = params.num_boids != self.params.num_boids;
        self.set_params(params)?;
        if respawn {
            self.reset_flock(rng)?;
        }
        Ok(())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pairwise_forces(&self) -> Vec<Vec3> {
        physics::pairwise_forces(&self.boids, &self.params, &self.curve)
    }
}

fn random_flock<R: Rng>(
    params: &SimulationParams,
    first_id: u32,
    rng: &mut R,
) -> Result<Vec<Boid>, SimulationError> {
    let arena = params.arena_radius;
    let drift = params.min_velocity;

    (0..params.num_boids)
        .map(|i| {
            let position = vec3(
                rng.gen_range(-1.0f32..=1.0) * arena,
                rng.gen_range(-1.0f32..=1.0) * arena,
                rng.gen_range(-1.0f32..=1.0) * arena,
            );
            let velocity = vec3(
                rng.gen_range(-1.0f32..=1.0) * drift,
                rng.gen_range(-1.0f32..=1.0) * drift,
                rng.gen_range(-1.0f32..=1.0) * drift,
            );
            Boid::new(first_id + i as u32, params.boid_mass, position, velocity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pair_simulation() -> Simulation {
        let params = SimulationParams {
            arena_radius: 10.0,
            ..SimulationParams::default()
        };
        let boids = vec![
            Boid::new(1, 1.0, vec3(0.1, 0.0, 0.0), vec3(1.0, 0.0, 0.0)).unwrap(),
            Boid::new(0, 1.0, Vec3::ZERO, vec3(1.0, 0.0, 0.0)).unwrap(),
        ];
        Simulation::new(params, ResponseCurve::default(), boids, Vec::new()).unwrap()
    }

    #[test]
    fn boids_are_ordered_by_id() {
        let sim = pair_simulation();
        let ids: Vec<u32> = sim.boids().iter().map(Boid::id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let boids = vec![
            Boid::new(4, 1.0, Vec3::ZERO, Vec3::X).unwrap(),
            Boid::new(4, 1.0, Vec3::ONE, Vec3::X).unwrap(),
        ];
        let result = Simulation::new(
            SimulationParams::default(),
            ResponseCurve::default(),
            boids,
            Vec::new(),
        );
        assert!(matches!(result, Err(SimulationError::DuplicateId(4))));
    }

    #[test]
    fn invalid_params_are_rejected_up_front() {
        let params = SimulationParams {
            cohesion_range: 0.1,
            ..SimulationParams::default()
        };
        let result = Simulation::new(params, ResponseCurve::default(), Vec::new(), Vec::new());
        assert!(matches!(result, Err(SimulationError::RangesNotIncreasing { .. })));
    }

    #[test]
    fn rejected_update_keeps_old_params() {
        let mut sim = pair_simulation();
        let before = sim.params().clone();
        let bad = SimulationParams {
            min_velocity: 30.0,
            ..before.clone()
        };
        assert!(sim.set_params(bad).is_err());
        assert_eq!(sim.params(), &before);

        let good = SimulationParams {
            gather_multiplier: 1.0,
            ..before
        };
        sim.set_params(good).unwrap();
        assert_eq!(sim.params().gather_multiplier, 1.0);
    }

    #[test]
    fn rejected_retune_leaves_the_flock_alone() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sim = pair_simulation();
        let before = sim.boids().to_vec();

        let bad = SimulationParams {
            num_boids: 12,
            max_velocity: 0.5,
            ..sim.params().clone()
        };
        assert!(sim.retune(bad, &mut rng).is_err());
        assert_eq!(sim.boids(), &before[..]);

        let good = SimulationParams {
            num_boids: 12,
            ..sim.params().clone()
        };
        sim.retune(good, &mut rng).unwrap();
        assert_eq!(sim.boids().len(), 12);
        assert_eq!(sim.boids()[0].id(), 2);

        // Same count: no respawn
        let ids: Vec<u32> = sim.boids().iter().map(Boid::id).collect();
        let tweak = SimulationParams {
            gather_multiplier: 1.5,
            ..sim.params().clone()
        };
        sim.retune(tweak, &mut rng).unwrap();
        assert!(sim.boids().iter().map(Boid::id).eq(ids));
    }

    #[test]
    fn step_runs_all_substeps_and_clears_accumulators() {
        let mut sim = pair_simulation();
        sim.step().unwrap();

        assert_eq!(sim.frames(), 1);
        for boid in sim.boids() {
            assert_eq!(boid.net_force(), Vec3::ZERO);
            assert_ne!(boid.last_force(), Vec3::ZERO);
            let speed = boid.velocity.length();
            assert!(speed >= 1.0 - 1e-5 && speed <= 15.0 + 1e-5);
        }
        // Avoidance pushed the pair further apart
        let gap = sim.boids()[1].position.x - sim.boids()[0].position.x;
        assert!(gap > 0.1);
    }

    #[test]
    fn random_flock_respects_counts_and_bounds() {
        let params = SimulationParams {
            num_boids: 40,
            ..SimulationParams::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut sim =
            Simulation::with_random_flock(params.clone(), ResponseCurve::default(), &mut rng).unwrap();

        assert_eq!(sim.boids().len(), 40);
        for (i, boid) in sim.boids().iter().enumerate() {
            assert_eq!(boid.id(), i as u32);
            assert_eq!(boid.mass(), params.boid_mass);
            assert!(boid.position.abs().max_element() <= params.arena_radius);
            assert!(boid.velocity.abs().max_element() <= params.min_velocity);
        }

        sim.reset_flock(&mut rng).unwrap();
        assert_eq!(sim.boids().first().map(Boid::id), Some(40));
        assert_eq!(sim.boids().last().map(Boid::id), Some(79));
    }

    #[test]
    fn obstacles_only_act_in_obstacle_mode() {
        let params = SimulationParams {
            arena_radius: 100.0,
            substeps: 1,
            ..SimulationParams::default()
        };
        let obstacle = Obstacle::new(vec3(0.0, 0.0, 5.0), vec3(0.0, 0.0, -5.0), 1.0);
        let boid = Boid::new(0, 1.0, vec3(0.0, -5.0, 0.0), vec3(0.0, 4.0, 0.0)).unwrap();

        let mut sim =
            Simulation::new(params, ResponseCurve::default(), vec![boid], vec![obstacle]).unwrap();
        sim.step().unwrap();
        assert_eq!(sim.boids()[0].last_force(), Vec3::ZERO);

        sim.toggle_obstacle_mode();
        assert!(sim.obstacle_mode());
        sim.step().unwrap();
        assert!(sim.boids()[0].last_force().y < 0.0);
    }

    #[test]
    fn parallel_step_matches_sequential_step() {
        let params = SimulationParams {
            num_boids: 60,
            arena_radius: 1.0,
            ..SimulationParams::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let mut sequential =
            Simulation::with_random_flock(params.clone(), ResponseCurve::default(), &mut rng).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut parallel = Simulation::with_random_flock(
            SimulationParams { enable_parallel: true, ..params },
            ResponseCurve::default(),
            &mut rng,
        )
        .unwrap();

        sequential.step().unwrap();
        parallel.step().unwrap();
        for (s, p) in sequential.boids().iter().zip(parallel.boids()) {
            assert!((s.position - p.position).length() < 1e-3);
        }
    }

    #[test]
    fn non_finite_state_is_reported() {
        let params = SimulationParams {
            substeps: 4,
            ..SimulationParams::default()
        };
        let boid = Boid::new(9, 1.0, Vec3::ZERO, vec3(f32::NAN, 0.0, 0.0)).unwrap();
        let mut sim = Simulation::new(params, ResponseCurve::default(), vec![boid], Vec::new()).unwrap();

        assert_eq!(sim.step(), Err(SimulationError::NonFinite { id: 9 }));
        assert_eq!(sim.frames(), 0);
        assert_eq!(sim.boids()[0].net_force(), Vec3::ZERO);
    }
}
