pub mod diagnostic_model;
pub mod enums;
pub mod patient;
pub mod prediction;
pub mod symptom;
pub mod user;

pub use diagnostic_model::*;
pub use patient::*;
pub use prediction::*;
pub use symptom::*;
pub use user::*;
