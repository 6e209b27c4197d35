pub mod database;
pub mod extract;
pub mod generator;
pub mod names;
pub mod patterns;
pub mod persist;
pub mod rng;
pub mod service;
pub mod textract;
