//! External command execution.
//!
//! Everything the installer does to the machine beyond creating a directory
//! goes through a [`CommandExecutor`]: git, package managers, the toolchain
//! and its build tool.

mod errors;
mod executor;
mod path_finder;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::CommandError;
pub use executor::{CommandExecutor, SystemExecutor};
pub use types::{CommandResult, CommandSpec};
