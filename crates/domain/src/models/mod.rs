//! Domain models and DTOs.

pub mod admin;
pub mod bom_request;
pub mod equipment;
pub mod event;
pub mod material;
pub mod team;
pub mod user;

pub use admin::*;
pub use bom_request::*;
pub use equipment::*;
pub use event::*;
pub use material::*;
pub use team::*;
pub use user::*;
