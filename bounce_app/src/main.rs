//! Bouncing-ball demo application
//!
//! Drives the engine headless: a box floor, two spheres dropped onto it,
//! and a fixed-timestep simulation loop that logs where everything ends
//! up. Rendering is replaced by a sink that counts submissions.

use impact_engine::prelude::*;
use nalgebra::Point3;

/// Sink standing in for a renderer: counts draw submissions per frame.
#[derive(Default)]
struct CountingSink {
    submissions: usize,
}

impl RenderSink for CountingSink {
    fn submit(&mut self, _layer: usize, _model_matrix: Mat4) {
        self.submissions += 1;
    }
}

/// Script that reports its object's height every second of simulated time.
struct HeightReporter {
    name: &'static str,
    elapsed: f32,
}

impl Behavior for HeightReporter {
    fn on_update(&mut self, object: &mut GameObject, delta_time: f32) -> Result<(), SceneError> {
        self.elapsed += delta_time;
        if self.elapsed >= 1.0 {
            self.elapsed = 0.0;
            let y = object.transform().borrow().world_position().y;
            let velocity = object.require_body()?.borrow().velocity();
            log::info!("{}: y = {y:.3}, vy = {:.3}", self.name, velocity.y);
        }
        Ok(())
    }
}

fn build_scene(simulation: &mut Simulation) {
    let physics = simulation.config().physics.clone();

    let floor = simulation.scene_mut().spawn();
    {
        let mut floor = floor.borrow_mut();
        floor
            .transform()
            .borrow_mut()
            .set_position(Vec3::new(0.0, -1.0, 0.0));
        floor.attach_collider(Collider::cuboid(Vec3::new(40.0, 2.0, 40.0)));
    }

    for (name, start) in [
        ("left ball", Point3::new(-2.0, 6.0, 0.0)),
        ("right ball", Point3::new(2.0, 9.0, 0.0)),
    ] {
        let ball = simulation.scene_mut().spawn();
        let mut ball = ball.borrow_mut();
        ball.set_layer(1);
        ball.transform()
            .borrow_mut()
            .set_position(start.coords);
        ball.attach_collider(Collider::sphere(0.5));
        ball.attach_body(PhysicalBody::from_config(&physics));
        ball.push_behavior(Box::new(HeightReporter { name, elapsed: 0.0 }));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    impact_engine::foundation::logging::init();

    let config = match SimulationConfig::load("bounce_app/config.toml") {
        Ok(config) => config,
        Err(ConfigError::Io(_)) => {
            log::info!("no config file found, using defaults");
            SimulationConfig::default()
        }
        Err(error) => return Err(error.into()),
    };

    let mut simulation = Simulation::new(config);
    build_scene(&mut simulation);

    // Ten simulated seconds in wall-clock-sized chunks.
    let frame_time = 1.0 / 120.0;
    let frames = (10.0 / frame_time) as usize;
    let mut sink = CountingSink::default();
    let mut timer = Timer::new();

    for _ in 0..frames {
        simulation.advance(frame_time)?;
        simulation.scene().render_into(&mut sink);
        timer.update();
    }

    log::info!(
        "done: {} ticks simulated in {:.3}s wall time, {} draw submissions",
        simulation.ticks(),
        timer.total_time(),
        sink.submissions
    );
    Ok(())
}
