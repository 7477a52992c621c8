//! Repository implementations.

pub mod bom_request;
pub mod equipment;
pub mod event;
pub mod material;
pub mod session;
pub mod team;
pub mod user;

pub use bom_request::{BomRequestRepository, BomScope};
pub use equipment::EquipmentRepository;
pub use event::EventRepository;
pub use material::MaterialRepository;
pub use session::SessionRepository;
pub use team::TeamRepository;
pub use user::UserRepository;
