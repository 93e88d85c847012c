//! Fixed-timestep simulation driver
//!
//! Wraps a [`Scene`] in the classic accumulator loop: wall-clock time is
//! fed in, whole fixed-size ticks are taken out. The step budget bounds
//! how far a slow frame is allowed to spiral; anything beyond it is
//! dropped with a warning.

use log::{info, warn};

use crate::config::SimulationConfig;
use crate::scene::{Scene, SceneError};

/// Scene plus fixed-step time accounting.
pub struct Simulation {
    scene: Scene,
    config: SimulationConfig,
    accumulator: f32,
    ticks: u64,
}

impl Simulation {
    /// Driver around an empty scene.
    pub fn new(config: SimulationConfig) -> Self {
        info!(
            "simulation ready: {}s fixed step, {} steps/frame budget",
            config.fixed_timestep, config.max_steps_per_frame
        );
        Self {
            scene: Scene::new(),
            config,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    /// The scene under simulation.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene for spawning and removal.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Total ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Feed elapsed wall-clock seconds; runs zero or more fixed ticks.
    ///
    /// Returns how many ticks ran. A tick error propagates immediately,
    /// leaving the unconsumed time in the accumulator.
    pub fn advance(&mut self, elapsed: f32) -> Result<u32, SceneError> {
        self.accumulator += elapsed;

        let step = self.config.fixed_timestep;
        let mut steps = 0;

        while self.accumulator >= step && steps < self.config.max_steps_per_frame {
            if let Err(error) = self.scene.tick(step) {
                warn!("tick {} failed: {error}", self.ticks);
                return Err(error);
            }
            self.accumulator -= step;
            self.ticks += 1;
            steps += 1;
        }

        if self.accumulator >= step {
            warn!(
                "simulation falling behind; dropping {:.3}s of simulated time",
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::PhysicalBody;
    use approx::assert_relative_eq;

    fn driver(fixed_timestep: f32, max_steps: u32) -> Simulation {
        let mut config = SimulationConfig::default();
        config.fixed_timestep = fixed_timestep;
        config.max_steps_per_frame = max_steps;
        Simulation::new(config)
    }

    #[test]
    fn advance_runs_whole_steps_and_banks_the_rest() {
        let mut simulation = driver(0.1, 8);

        assert_eq!(simulation.advance(0.25).unwrap(), 2);
        assert_eq!(simulation.ticks(), 2);

        // The banked 0.05s completes a step with another 0.05s.
        assert_eq!(simulation.advance(0.05).unwrap(), 1);
    }

    #[test]
    fn step_budget_caps_a_slow_frame() {
        let mut simulation = driver(0.1, 2);

        assert_eq!(simulation.advance(1.0).unwrap(), 2);
        // Excess time was dropped, not carried into the next frame.
        assert_eq!(simulation.advance(0.0).unwrap(), 0);
    }

    #[test]
    fn fixed_steps_integrate_scene_bodies_deterministically() {
        let mut simulation = driver(0.5, 8);
        let object = simulation.scene_mut().spawn();
        let body = {
            let mut body = PhysicalBody::new();
            body.gravity = 0.0;
            body.moving_resistance = 0.0;
            body.set_velocity(Vec3::new(1.0, 0.0, 0.0));
            object.borrow_mut().attach_body(body)
        };

        simulation.advance(1.0).unwrap();

        let transform = object.borrow().transform();
        let position = transform.borrow().position();
        assert_relative_eq!(position, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(body.borrow().velocity().x, 1.0, epsilon = 1e-6);
    }
}
