//! Bubble aggregate: the node entity, the force simulation laying nodes out,
//! and the services deriving what gets drawn.

pub mod entities;
pub mod forces;
pub mod services;
pub mod simulation;

pub use entities::*;
pub use forces::{CenterX, CenterY, Collide, Drift, Force, ManyBody};
pub use services::*;
pub use simulation::*;
