use serde::{Deserialize, Serialize};

/// Simulation parameters that control vehicle physics, sensing, and
/// evolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Drag coefficient: drag = (speed + `drag_shift`)^2 * `drag_force`,
    /// applied once per tick against the velocity direction.
    pub drag_force: f64,
    /// Constant added to speed inside the drag term.
    pub drag_shift: f64,
    /// Speed below which a vehicle snaps to zero velocity and dies.
    pub stall_speed: f64,
    /// Maximum forward/backward acceleration (world units per second^2).
    pub max_accel: f64,
    /// Maximum turn rate (radians per second).
    pub max_turn_speed: f64,
    /// Vehicle body length (along the heading).
    pub body_length: f64,
    /// Vehicle body width (across the heading).
    pub body_width: f64,
    /// Number of distance sensor rays.
    pub num_sensors: usize,
    /// Maximum sensor ray range.
    pub sensor_range: f64,
    /// Vehicles per generation.
    pub population_size: usize,
    /// Per-element probability of resampling a gene during mutation.
    pub mutation_rate: f64,
    /// Simulated seconds after which a training generation is force-killed.
    pub generation_time_limit: f64,
    /// Neural network layer dimensions, input to output.
    pub layer_sizes: Vec<usize>,
}

impl Params {
    /// Half the body diagonal, the corner radius of the collision
    /// rectangle.
    pub fn half_diagonal(&self) -> f64 {
        ((self.body_length / 2.0).powi(2) + (self.body_width / 2.0).powi(2)).sqrt()
    }

    /// Angle between the heading and the front corners.
    pub fn diagonal_angle(&self) -> f64 {
        (self.body_width / 2.0).atan2(self.body_length / 2.0)
    }

    /// Sensor ray offsets from the heading: `num_sensors` angles evenly
    /// spaced across the forward arc [-pi/2, pi/2], endpoints included.
    pub fn sensor_angles(&self) -> Vec<f64> {
        let n = self.num_sensors;
        if n == 1 {
            return vec![0.0];
        }
        let step = std::f64::consts::PI / (n as f64 - 1.0);
        (0..n)
            .map(|i| -std::f64::consts::FRAC_PI_2 + i as f64 * step)
            .collect()
    }
}

impl Default for Params {
    fn default() -> Self {
        let num_sensors = 7;
        Self {
            drag_force: 1.4e-4,
            drag_shift: 35.0,
            stall_speed: 2.0,
            max_accel: 1100.0,
            max_turn_speed: 6.0,
            body_length: 32.0,
            body_width: 16.0,
            num_sensors,
            sensor_range: 150.0,
            population_size: 500,
            mutation_rate: 0.1,
            generation_time_limit: 60.0,
            // Inputs are the sensor readings plus current speed
            layer_sizes: vec![num_sensors + 1, num_sensors + 4, num_sensors + 4, 2],
        }
    }
}
