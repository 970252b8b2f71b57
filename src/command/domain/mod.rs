//! Command domain: the closed operation set and its log entries.

mod command;
mod ids;
mod record;

pub use command::Command;
pub use ids::CommandId;
pub use record::CommandRecord;
