//! # Raceline - Evolutionary Track-Driving Simulation
//!
//! A simulation of vehicles with neural network controllers that learn to
//! drive a walled track through a genetic algorithm. Each generation, every
//! vehicle senses the walls with distance rays, steers and accelerates from
//! its network's outputs, and dies on wall contact or stalling; the two
//! fittest drivers seed the next generation through crossover and mutation.
//!
//! ## Features
//!
//! - Feedforward neural controllers (tanh MLP with variance-scaled init)
//! - Genetic algorithm evolution (splice crossover and resample mutation)
//! - Ray-based wall sensing with exact segment geometry
//! - Bounding-volume tree over static track walls with batched queries
//! - Deterministic fixed-timestep physics with a drag/stall model
//! - Save/load of generation and parent state
//!
//! ## Core Modules
//!
//! - [`simulation::vehicle`] - Vehicle kinematics, sensing, and fitness
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::evolution`] - Generation loop, selection, and breeding
//! - [`simulation::aabb`] - Spatial index over wall segments
//! - [`simulation::geometry`] - Segment intersection predicates
//!
//! The crate is rendering-agnostic: the surrounding application owns the
//! window, drives [`simulation::evolution::Evolution::step`] at a fixed
//! timestep, and draws from the read-only vehicle snapshots.

/// Core simulation logic and data structures.
pub mod simulation {
    /// Bounding boxes and the bounding-volume tree over wall segments.
    pub mod aabb;
    /// Neural network controllers for vehicles.
    pub mod brain;
    /// Generation orchestration: ticking, selection, crossover, mutation.
    pub mod evolution;
    /// Exact line-segment geometry predicates.
    pub mod geometry;
    /// Simulation parameters.
    pub mod params;
    /// Best-effort persistence of generation and parent state.
    pub mod persist;
    /// Track walls and their spatial index.
    pub mod track;
    /// Vehicle state, kinematics, sensing, and fitness.
    pub mod vehicle;
}
