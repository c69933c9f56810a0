#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::fs;

use rand::SeedableRng;
use rand::rngs::StdRng;
use raceline::simulation::brain::Brain;
use raceline::simulation::evolution::{ParentPair, ParentRecord};
use raceline::simulation::params::Params;
use raceline::simulation::persist::{
    SetupState, load_parents, load_setup, load_track, save_parents, save_setup,
};

fn record(seed: u64, fitness: f64) -> ParentRecord {
    let mut rng = StdRng::seed_from_u64(seed);
    let (weights, biases) = Brain::new_random(&Params::default().layer_sizes, &mut rng).flatten();
    ParentRecord {
        fitness,
        x: 120.0,
        y: 340.0,
        angle: 1.25,
        weights,
        biases,
    }
}

#[test]
fn test_setup_round_trip() {
    let path = "test_setup_round_trip.json";
    let setup = SetupState {
        generation: 14,
        x: 650.0,
        y: 400.0,
        angle: -0.5,
    };

    save_setup(path, &setup).expect("save setup");
    let loaded = load_setup(path).expect("load setup");
    assert_eq!(loaded, setup);

    fs::remove_file(path).ok();
}

#[test]
fn test_parents_round_trip() {
    let path = "test_parents_round_trip.json";
    let parents = ParentPair {
        parent1: record(1, 10.0),
        parent2: record(2, 25.0),
    };

    save_parents(path, &parents).expect("save parents");
    let loaded = load_parents(path).expect("load parents");

    // Flattened network parameters survive the JSON round trip exactly
    assert_eq!(loaded, parents);

    fs::remove_file(path).ok();
}

#[test]
fn test_missing_state_is_no_prior_state() {
    assert!(load_setup("nonexistent_setup.json").is_none());
    assert!(load_parents("nonexistent_parents.json").is_none());
}

#[test]
fn test_corrupt_state_is_no_prior_state() {
    let path = "test_corrupt_setup.json";
    fs::write(path, "{ this is not valid json }").expect("write test file");

    assert!(load_setup(path).is_none());
    assert!(load_parents(path).is_none());

    fs::remove_file(path).ok();
}

#[test]
fn test_save_creates_valid_json() {
    let path = "test_setup_valid.json";
    let setup = SetupState {
        generation: 3,
        x: 1.0,
        y: 2.0,
        angle: 0.0,
    };
    save_setup(path, &setup).expect("save setup");

    let json = fs::read_to_string(path).expect("read save file");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(parsed.get("generation").and_then(|v| v.as_u64()), Some(3));
    assert!(parsed.get("x").is_some());
    assert!(parsed.get("angle").is_some());

    fs::remove_file(path).ok();
}

#[test]
fn test_load_track_from_text_format() {
    let path = "test_track_format.txt";
    // Two polylines: a three-point chain and a single segment, with a blank
    // line between them
    fs::write(path, "0 0 100 0 100 80\n\n200 0 300 0\n").expect("write track file");

    let track = load_track(path).expect("parse track");
    assert_eq!(track.len(), 3);

    let segments = track.segments();
    assert_eq!(segments[0].a[0], 0.0);
    assert_eq!(segments[0].b[0], 100.0);
    assert_eq!(segments[1].a[1], 0.0);
    assert_eq!(segments[1].b[1], 80.0);
    assert_eq!(segments[2].a[0], 200.0);
    assert_eq!(segments[2].b[0], 300.0);

    fs::remove_file(path).ok();
}

#[test]
fn test_load_track_rejects_non_numeric_input() {
    let path = "test_track_bad.txt";
    fs::write(path, "0 0 oops 0\n").expect("write track file");

    assert!(load_track(path).is_err());

    fs::remove_file(path).ok();
}

#[test]
fn test_load_track_missing_file() {
    assert!(load_track("nonexistent_track.txt").is_err());
}
