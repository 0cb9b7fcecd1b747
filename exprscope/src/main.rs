//! Main binary entry point for `exprscope`.
//!
//! This binary simply delegates to the shared `entry_point::run_with_args()` function
//! so both binaries behave the same.

use anyhow::Result;

fn main() -> Result<()> {
    let code = exprscope::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
