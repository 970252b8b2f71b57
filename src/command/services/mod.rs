//! Command execution services.

mod manager;
mod shared;

pub use manager::CommandManager;
pub use shared::SharedTaskMan;
