//! Built-in commands.
//!
//! Each command implements the
//! [`ManagementCommand`](crate::command::ManagementCommand) trait.

pub mod classlog;
pub mod orm;
pub mod record;
pub mod singleton;

pub use classlog::ClasslogCommand;
pub use orm::OrmCommand;
pub use record::RecordCommand;
pub use singleton::SingletonCommand;

use crate::command::CommandRegistry;

/// Registers all built-in commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(OrmCommand));
    registry.register(Box::new(RecordCommand));
    registry.register(Box::new(SingletonCommand));
    registry.register(Box::new(ClasslogCommand));
}
