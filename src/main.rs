//! Kodegen Bundler MSI - Windows installer packager for Electron builds.

use kodegen_bundler_msi::cli::{self, OutputManager};
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            OutputManager::new(false).failure(&e);
            1
        }
    };

    process::exit(exit_code);
}
