//! Database entity definitions (row mappings).

pub mod bom_request;
pub mod equipment;
pub mod event;
pub mod material;
pub mod session;
pub mod team;
pub mod user;

pub use bom_request::{BomRequestEntity, BomRequestWithStudentEntity, BomStatusDb};
pub use equipment::EquipmentEntity;
pub use event::EventEntity;
pub use material::{MaterialEntity, MaterialFormDb};
pub use session::SessionEntity;
pub use team::TeamEntity;
pub use user::{RoleDb, UserEntity};
