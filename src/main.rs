//=========================================================================
// Survival Client Binary
//=========================================================================

use std::process::ExitCode;

use env_logger::{Builder, Env};
use log::error;
use survival_client::ApplicationBuilder;

fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    match ApplicationBuilder::new().build().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Client exited with error: {}", e);
            ExitCode::FAILURE
        }
    }
}
