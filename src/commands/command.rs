//! Command trait definition for CLI commands.
//!
//! Every fgconcord subcommand implements [`Command`]; dispatch from the parsed
//! subcommand enum goes through `enum_dispatch`.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all fgconcord CLI commands.
///
/// `command_line` is the full invocation, logged before the command runs.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
