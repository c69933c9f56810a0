//! Vehicle state, kinematics, sensing, and fitness.
//!
//! A vehicle is alive until its body rectangle touches a wall or its speed
//! falls below the stall threshold; both transitions are terminal for the
//! generation. Fitness is computed exactly once, at the death transition.
//!
//! Coordinates are standard math axes: heading 0 points along +x and
//! positive angles turn counterclockwise.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::geometry;
use super::params::Params;
use super::track::WallSegment;

/// A position plus heading, used for spawn points and parent records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Heading in radians.
    pub angle: f64,
}

/// Read-only per-vehicle state exposed to the surrounding renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Heading in radians.
    pub angle: f64,
    /// Whether the vehicle has died this generation.
    pub dead: bool,
    /// Fitness score; meaningful once `dead` is set.
    pub fitness: f64,
}

/// A simulated vehicle with a neural network controller.
#[derive(Debug, Clone)]
pub struct Vehicle {
    start: Pose,
    /// Position in 2D space.
    pub pos: Array1<f64>,
    /// Velocity in world units per second.
    pub vel: Array1<f64>,
    /// Heading in radians.
    pub angle: f64,
    /// Whether the vehicle has died this generation.
    pub dead: bool,
    /// Accumulated simulated lifetime this generation.
    pub lifespan: f64,
    /// Signed forward progress: per-tick displacement projected onto the
    /// heading.
    pub total_movement: f64,
    /// Accumulated magnitude of heading changes.
    pub total_rotation: f64,
    /// Fitness score, written once at the death transition.
    pub fitness: f64,
    /// Neural network that steers and accelerates the vehicle.
    pub brain: Brain,
}

impl Vehicle {
    /// Creates a vehicle at the starting pose with the given controller.
    pub fn new(start: Pose, brain: Brain) -> Self {
        let mut vehicle = Self {
            start,
            pos: Array1::zeros(2),
            vel: Array1::zeros(2),
            angle: 0.0,
            dead: false,
            lifespan: 0.0,
            total_movement: 0.0,
            total_rotation: 0.0,
            fitness: 0.0,
            brain,
        };
        vehicle.reset();
        vehicle
    }

    /// Restores the starting pose and zeroes every accumulator. The
    /// controller's parameters are preserved.
    pub fn reset(&mut self) {
        self.pos = Array1::from_vec(vec![self.start.x, self.start.y]);
        self.vel = Array1::zeros(2);
        self.angle = self.start.angle;
        self.dead = false;
        self.lifespan = 0.0;
        self.total_movement = 0.0;
        self.total_rotation = 0.0;
        self.fitness = 0.0;
    }

    /// Current speed (velocity magnitude).
    pub fn speed(&self) -> f64 {
        self.vel.dot(&self.vel).sqrt()
    }

    /// Transitions to Dead and computes fitness from the accumulators.
    /// Idempotent: a second call does not recompute.
    pub fn kill(&mut self) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.fitness = if self.lifespan == 0.0 {
            0.0
        } else {
            self.total_movement * self.total_movement.abs() * (self.total_rotation + self.lifespan)
                / self.lifespan.powi(2)
        };
    }

    /// Read-only snapshot for rendering.
    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            x: self.pos[0],
            y: self.pos[1],
            angle: self.angle,
            dead: self.dead,
            fitness: self.fitness,
        }
    }

    /// Corners of the body rectangle as a closed 5-point loop, so
    /// consecutive pairs are the four body edges.
    pub fn body_points(&self, params: &Params) -> Vec<Array1<f64>> {
        let radius = params.half_diagonal();
        let small = self.angle - params.diagonal_angle();
        let big = self.angle + params.diagonal_angle();

        let front_right = Array1::from_vec(vec![small.cos(), small.sin()]) * radius;
        let front_left = Array1::from_vec(vec![big.cos(), big.sin()]) * radius;

        vec![
            &self.pos + &front_right,
            &self.pos + &front_left,
            &self.pos - &front_right,
            &self.pos - &front_left,
            &self.pos + &front_right,
        ]
    }

    /// Farthest reachable point of each sensor ray: `num_sensors` endpoints
    /// fanned across the forward arc at `sensor_range` from the position.
    pub fn sensor_points(&self, params: &Params) -> Vec<Array1<f64>> {
        params
            .sensor_angles()
            .iter()
            .map(|offset| {
                let angle = self.angle + offset;
                let direction = Array1::from_vec(vec![angle.cos(), angle.sin()]);
                &self.pos + &(direction * params.sensor_range)
            })
            .collect()
    }

    /// Tests the body outline against the candidate walls.
    pub fn check_collision(
        &self,
        body_points: &[Array1<f64>],
        candidates: &[usize],
        segments: &[WallSegment],
    ) -> bool {
        for edge in body_points.windows(2) {
            for &wall in candidates {
                let wall = &segments[wall];
                if geometry::segments_intersect(&edge[0], &edge[1], &wall.a, &wall.b) {
                    return true;
                }
            }
        }
        false
    }

    /// Distance reading per sensor ray: the nearest candidate-wall
    /// intersection, clamped to the sensor range when nothing is hit.
    pub fn sensor_readings(
        &self,
        params: &Params,
        sensor_points: &[Array1<f64>],
        candidates: &[usize],
        segments: &[WallSegment],
    ) -> Vec<f64> {
        sensor_points
            .iter()
            .map(|ray_end| {
                let mut closest = params.sensor_range;
                for &wall in candidates {
                    let wall = &segments[wall];
                    if let Some(point) =
                        geometry::intersection_point(&self.pos, ray_end, &wall.a, &wall.b)
                    {
                        let offset = &point - &self.pos;
                        closest = closest.min(offset.dot(&offset).sqrt());
                    }
                }
                closest
            })
            .collect()
    }

    /// Applies a heading change and accumulates its magnitude.
    pub fn turn(&mut self, radians: f64) {
        self.angle += radians;
        self.total_rotation += radians.abs();
    }

    /// Applies thrust along the heading, then drag, then integrates the
    /// position. A speed at or below the stall threshold snaps the velocity
    /// to zero and kills the vehicle this tick.
    pub fn drive(&mut self, accel: f64, dt: f64, params: &Params) {
        let dist = accel * dt;
        self.vel[0] += self.angle.cos() * dist;
        self.vel[1] += self.angle.sin() * dist;

        let mag = self.speed();
        if mag > 0.0 {
            if mag > params.stall_speed {
                // Drag is per tick, not per second: the model is fixed-dt
                let drag = (mag + params.drag_shift).powi(2) * params.drag_force;
                self.vel = &self.vel - &(&self.vel / mag * drag);
                self.pos = &self.pos + &(&self.vel * dt);
            } else {
                self.vel.fill(0.0);
            }
        }

        // Signed forward progress: displacement projected onto the heading
        let movement = &self.vel * dt;
        let motion_angle = movement[1].atan2(movement[0]);
        self.total_movement += (motion_angle - self.angle).cos() * movement.dot(&movement).sqrt();

        if self.speed() < params.stall_speed {
            self.kill();
        }
    }

    /// Advances the vehicle one fixed timestep.
    ///
    /// The candidate lists come from the track's batched spatial queries;
    /// `body_points` and `sensor_points` are the same geometry those query
    /// boxes were built from, so collision and sensing agree with the
    /// pre-filter exactly.
    pub fn update(
        &mut self,
        dt: f64,
        params: &Params,
        segments: &[WallSegment],
        body_candidates: &[usize],
        body_points: &[Array1<f64>],
        sensor_candidates: &[usize],
        sensor_points: &[Array1<f64>],
    ) {
        if self.dead {
            return;
        }

        self.lifespan += dt;

        if self.check_collision(body_points, body_candidates, segments) {
            self.kill();
            return;
        }

        let mut inputs = self.sensor_readings(params, sensor_points, sensor_candidates, segments);
        inputs.push(self.speed());
        let inputs = Array1::from_vec(inputs);

        let outputs = self.brain.predict(&inputs);
        let (steer, throttle) = (outputs[0], outputs[1]);

        self.turn(steer * params.max_turn_speed * dt);
        self.drive(throttle * params.max_accel, dt, params);
    }
}
