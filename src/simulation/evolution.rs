//! Generation orchestration: ticking, selection, crossover, and mutation.
//!
//! One tick is atomic: all live vehicles' query boxes are gathered first,
//! two batched spatial queries are issued (collision boxes, sensor boxes),
//! and only then is each vehicle updated. Every vehicle therefore sees the
//! same read-only track and never observes another vehicle's same-tick
//! movement. Generation transitions are explicit operations invoked by the
//! surrounding collaborator between ticks.

use ndarray::Array1;
use ndarray_rand::rand_distr::StandardNormal;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::aabb::BoundingBox;
use super::brain::{Brain, ShapeError};
use super::params::Params;
use super::track::Track;
use super::vehicle::{Pose, Vehicle, VehicleSnapshot};

/// A saved top-fitness vehicle: final pose, fitness, and flattened network
/// parameters, used to seed the next generation's crossover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRecord {
    /// Fitness at death.
    pub fitness: f64,
    /// Final x coordinate.
    pub x: f64,
    /// Final y coordinate.
    pub y: f64,
    /// Final heading in radians.
    pub angle: f64,
    /// Flattened weight stream.
    pub weights: Vec<f64>,
    /// Flattened bias stream.
    pub biases: Vec<f64>,
}

/// The two top-fitness vehicles of a completed generation. `parent2` is the
/// best, `parent1` the runner-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentPair {
    /// Runner-up by fitness.
    pub parent1: ParentRecord,
    /// Best by fitness.
    pub parent2: ParentRecord,
}

/// Fitness summary of the most recently completed generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Highest fitness in the generation.
    pub best_fitness: f64,
    /// Mean fitness across the population.
    pub mean_fitness: f64,
}

/// Drives the population through generations.
#[derive(Debug)]
pub struct Evolution {
    /// The population, in creation order.
    pub vehicles: Vec<Vehicle>,
    generation: u32,
    start: Pose,
    training: bool,
    train_time: f64,
    last_stats: Option<GenerationStats>,
    rng: StdRng,
}

impl Evolution {
    /// Starts a training run: a full population at the starting pose, each
    /// vehicle carrying either a fresh random controller or (when `parents`
    /// is supplied) an independently bred child of the two parents.
    ///
    /// Fails with [`ShapeError`] if a supplied parent's flattened
    /// parameters do not fit `params.layer_sizes`.
    pub fn train(
        params: &Params,
        start: Pose,
        generation: u32,
        parents: Option<&ParentPair>,
        seed: u64,
    ) -> Result<Self, ShapeError> {
        let mut rng = StdRng::seed_from_u64(seed);

        // Reject malformed parent records before any vehicle is built, so
        // the splice in breed_child always sees equal-length streams
        if let Some(pair) = parents {
            for parent in [&pair.parent1, &pair.parent2] {
                Brain::from_flattened(&params.layer_sizes, &parent.weights, &parent.biases)?;
            }
        }

        let mut vehicles = Vec::with_capacity(params.population_size);
        for _ in 0..params.population_size {
            let brain = match parents {
                Some(pair) => breed_child(params, pair, &mut rng)?,
                None => Brain::new_random(&params.layer_sizes, &mut rng),
            };
            vehicles.push(Vehicle::new(start, brain));
        }

        Ok(Self {
            vehicles,
            generation,
            start,
            training: true,
            train_time: 0.0,
            last_stats: None,
            rng,
        })
    }

    /// Starts a replay run: two vehicles carrying the saved parent
    /// controllers verbatim, with no crossover and no mutation.
    pub fn replay(
        params: &Params,
        start: Pose,
        parents: &ParentPair,
        seed: u64,
    ) -> Result<Self, ShapeError> {
        let vehicles = [&parents.parent1, &parents.parent2]
            .into_iter()
            .map(|parent| {
                let brain =
                    Brain::from_flattened(&params.layer_sizes, &parent.weights, &parent.biases)?;
                Ok(Vehicle::new(start, brain))
            })
            .collect::<Result<Vec<_>, ShapeError>>()?;

        Ok(Self {
            vehicles,
            generation: 1,
            start,
            training: false,
            train_time: 0.0,
            last_stats: None,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Advances the simulation one atomic tick of fixed duration `dt`.
    pub fn step(&mut self, params: &Params, track: &Track, dt: f64) {
        let mut live: Vec<usize> = Vec::new();
        let mut body_points: Vec<Vec<Array1<f64>>> = Vec::new();
        let mut body_boxes: Vec<BoundingBox> = Vec::new();
        let mut sensor_points: Vec<Vec<Array1<f64>>> = Vec::new();
        let mut sensor_boxes: Vec<BoundingBox> = Vec::new();

        for (index, vehicle) in self.vehicles.iter().enumerate() {
            if vehicle.dead {
                continue;
            }
            live.push(index);

            let body = vehicle.body_points(params);
            body_boxes.push(BoundingBox::from_points(&body));
            body_points.push(body);

            let sensors = vehicle.sensor_points(params);
            // The sensor box covers the rays' reach and the vehicle itself
            let mut span = sensors.clone();
            span.push(vehicle.pos.clone());
            sensor_boxes.push(BoundingBox::from_points(&span));
            sensor_points.push(sensors);
        }

        let body_hits = track.query(&body_boxes);
        let sensor_hits = track.query(&sensor_boxes);

        for (slot, &index) in live.iter().enumerate() {
            self.vehicles[index].update(
                dt,
                params,
                track.segments(),
                &body_hits[slot],
                &body_points[slot],
                &sensor_hits[slot],
                &sensor_points[slot],
            );
        }

        if self.training {
            self.train_time += dt;
            if self.train_time >= params.generation_time_limit {
                self.kill_generation();
            }
        }
    }

    /// Force-kills every vehicle, fixing each fitness from its current
    /// accumulators, and rewinds the training clock.
    pub fn kill_generation(&mut self) {
        self.train_time = 0.0;
        for vehicle in &mut self.vehicles {
            vehicle.kill();
        }
    }

    /// Returns `true` once every vehicle is dead.
    pub fn generation_complete(&self) -> bool {
        self.vehicles.iter().all(|vehicle| vehicle.dead)
    }

    /// Selects parents from the finished generation, breeds the next
    /// population in place, and returns the parent records for persistence.
    ///
    /// The population is stable-sorted by fitness ascending (creation order
    /// breaks ties) and the top two become parents. Every vehicle receives
    /// an independently bred child controller and is reset to the starting
    /// pose; the generation counter increments.
    pub fn advance_generation(&mut self, params: &Params) -> Result<ParentPair, ShapeError> {
        let mut order: Vec<usize> = (0..self.vehicles.len()).collect();
        order.sort_by(|&a, &b| {
            self.vehicles[a]
                .fitness
                .total_cmp(&self.vehicles[b].fitness)
        });

        let best = &self.vehicles[order[order.len() - 1]];
        let runner_up = &self.vehicles[order[order.len() - 2]];
        let parents = ParentPair {
            parent1: parent_record(runner_up),
            parent2: parent_record(best),
        };

        let mean = self
            .vehicles
            .iter()
            .map(|vehicle| vehicle.fitness)
            .sum::<f64>()
            / self.vehicles.len() as f64;
        self.last_stats = Some(GenerationStats {
            best_fitness: parents.parent2.fitness,
            mean_fitness: mean,
        });

        tracing::info!(
            generation = self.generation,
            best = parents.parent2.fitness,
            mean,
            "generation complete"
        );

        for index in 0..self.vehicles.len() {
            let brain = breed_child(params, &parents, &mut self.rng)?;
            self.vehicles[index].brain = brain;
            self.vehicles[index].reset();
        }

        self.generation += 1;
        self.train_time = 0.0;

        Ok(parents)
    }

    /// Replay mode's reset: every vehicle returns to the start with its
    /// controller untouched.
    pub fn restart(&mut self) {
        for vehicle in &mut self.vehicles {
            vehicle.reset();
        }
    }

    /// Current generation number.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The starting pose shared by this generation's population.
    pub fn start_pose(&self) -> Pose {
        self.start
    }

    /// Whether this run breeds new generations (false for replay).
    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Simulated time spent in the current generation.
    pub fn train_time(&self) -> f64 {
        self.train_time
    }

    /// Fitness summary of the most recently completed generation, if any.
    pub fn last_stats(&self) -> Option<GenerationStats> {
        self.last_stats
    }

    /// Number of currently dead vehicles.
    pub fn dead_count(&self) -> usize {
        self.vehicles.iter().filter(|vehicle| vehicle.dead).count()
    }

    /// Read-only per-vehicle state for rendering.
    pub fn snapshots(&self) -> Vec<VehicleSnapshot> {
        self.vehicles.iter().map(Vehicle::snapshot).collect()
    }
}

/// Captures a finished vehicle as a parent record.
fn parent_record(vehicle: &Vehicle) -> ParentRecord {
    let (weights, biases) = vehicle.brain.flatten();
    ParentRecord {
        fitness: vehicle.fitness,
        x: vehicle.pos[0],
        y: vehicle.pos[1],
        angle: vehicle.angle,
        weights,
        biases,
    }
}

/// Breeds one child controller from two parents: an independent
/// uniform-random split per parameter stream, then per-element mutation.
fn breed_child<R: Rng + ?Sized>(
    params: &Params,
    parents: &ParentPair,
    rng: &mut R,
) -> Result<Brain, ShapeError> {
    let weights = crossover(
        &parents.parent1.weights,
        &parents.parent2.weights,
        rng.gen_range(0..parents.parent1.weights.len()),
    );
    let biases = crossover(
        &parents.parent1.biases,
        &parents.parent2.biases,
        rng.gen_range(0..parents.parent1.biases.len()),
    );

    let weights = mutate(weights, params.mutation_rate, rng);
    let biases = mutate(biases, params.mutation_rate, rng);

    Brain::from_flattened(&params.layer_sizes, &weights, &biases)
}

/// Splices two parameter streams at `split`: the child takes the first
/// parent's prefix and the second parent's suffix.
fn crossover(parent1: &[f64], parent2: &[f64], split: usize) -> Vec<f64> {
    parent1[..split]
        .iter()
        .chain(&parent2[split..])
        .copied()
        .collect()
}

/// Replaces each gene with a fresh standard-normal draw with probability
/// `rate`.
fn mutate<R: Rng + ?Sized>(mut genes: Vec<f64>, rate: f64, rng: &mut R) -> Vec<f64> {
    for gene in &mut genes {
        if rng.gen_range(0.0..1.0) < rate {
            *gene = rng.sample(StandardNormal);
        }
    }
    genes
}
