//! Small, dependency-free helpers shared by the model and service layers.

pub mod requirements;
pub mod validate;
