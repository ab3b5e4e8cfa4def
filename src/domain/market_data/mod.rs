//! Market data aggregate: raw coin records, the cached snapshot and the
//! mapping service that turns them into bubbles.

pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use services::*;
pub use value_objects::*;
