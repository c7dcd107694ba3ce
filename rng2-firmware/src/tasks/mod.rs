//! Embassy async tasks

pub mod rng;

pub use rng::rng_task;
