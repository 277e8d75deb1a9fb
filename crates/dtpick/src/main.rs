//! Main entry point for dtpick
//!
//! With any arguments the scripted command-line host runs; without arguments
//! the GUI demo host opens.

use anyhow::Result;

fn main() -> Result<()> {
    if dtpick_cli::should_run_cli_mode() {
        dtpick_cli::run().map_err(|e| anyhow::anyhow!(e))?;
    } else {
        dtpick_gui::run()?;
    }

    Ok(())
}
