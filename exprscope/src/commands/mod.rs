//! Commands module - CLI subcommand implementations.

mod points;
mod utils;
mod wrap;

pub use points::run_points;
pub use utils::{exit_status, Context, LoadedProgram};
pub use wrap::{run_wrap, WrapOptions};
