//! SeaORM entities mapping to the worker's database tables.

pub mod probe_log;
pub mod target;

// Prelude module for easy importing of all entities and their related types
pub mod prelude {
    pub use super::target::ActiveModel as TargetActiveModel;
    pub use super::target::Column as TargetColumn;
    pub use super::target::Entity as Target;
    pub use super::target::Model as TargetModel;

    pub use super::probe_log::ActiveModel as ProbeLogActiveModel;
    pub use super::probe_log::Column as ProbeLogColumn;
    pub use super::probe_log::Entity as ProbeLog;
    pub use super::probe_log::Model as ProbeLogModel;
}
