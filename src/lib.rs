pub mod config;
pub mod errors;
pub mod extraction;
pub mod merge;
pub mod normalize;
pub mod resolution;
pub mod sources;
pub mod storage;
pub mod types;
