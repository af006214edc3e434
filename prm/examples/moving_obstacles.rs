use log::info;
use nalgebra as na;
use rand::prelude::*;

use prm::{PRMBuilder, Point3};

const WORLD_SIZE: f32 = 60.0;
const N_OBSTACLES: usize = 40;
const TICKS: usize = 20;

fn point3(x: f32, y: f32, z: f32) -> Point3 {
    na::Point3::new(x, y, z)
}

struct MovingObstacles {
    positions: Vec<Point3>,
    velocities: Vec<na::Vector3<f32>>,
}

impl MovingObstacles {
    fn random(rng: &mut StdRng) -> Self {
        let positions = (0..N_OBSTACLES).map(|_| rng.gen::<Point3>() * WORLD_SIZE).collect();
        let velocities = (0..N_OBSTACLES)
            .map(|_| (rng.gen::<na::Vector3<f32>>() - na::Vector3::repeat(0.5)) * 4.0)
            .collect();
        MovingObstacles { positions, velocities }
    }

    // Moves every obstacle one tick, bouncing off the walls of the world.
    fn step(&mut self) {
        for (p, v) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *p += *v;
            for axis in 0..3 {
                if p[axis] < 0.0 || p[axis] > WORLD_SIZE {
                    v[axis] = -v[axis];
                    p[axis] = p[axis].clamp(0.0, WORLD_SIZE);
                }
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let start = point3(10.0, 10.0, 10.0);
    let goal = point3(50.0, 50.0, 50.0);
    let mut rng = StdRng::seed_from_u64(42);
    let mut obstacles = MovingObstacles::random(&mut rng);

    for tick in 0..TICKS {
        let result = PRMBuilder::new(start, goal)
            .extend_obstacles(obstacles.positions.iter().copied())
            .with_clearance(2.0)
            .solve(&mut rng)?;

        match result.path() {
            Some(path) => info!(
                "tick {}: {} waypoints, cost {:.2}, {} roadmap edges",
                tick,
                path.len(),
                path.cost,
                result.roadmap.edge_count()
            ),
            None => info!("tick {}: no path", tick),
        }

        obstacles.step();
    }

    Ok(())
}
