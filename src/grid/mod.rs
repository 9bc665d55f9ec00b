//! Grid environments with teleporting key cells.

pub mod world;

pub use world::{
    GridWorld, Teleport, MoveOutcome, OUT_OF_BOUNDS_REWARD,
    random_policy_reference, value_weighted_reference,
};
