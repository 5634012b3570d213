pub mod generator;
pub mod youtube;
