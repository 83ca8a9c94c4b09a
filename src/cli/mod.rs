//! Command line interface for the MSI packager.

mod args;
mod output;

pub use args::{Args, ExtractorKind};
pub use output::OutputManager;

use crate::{
    bundler::Bundler,
    error::{CliError, Result},
};

/// Exit code after Ctrl-C.
const INTERRUPTED: i32 = 130;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let output = OutputManager::new(args.quiet);
    let settings = args.settings()?;
    output.header(&settings)?;
    let bundler = Bundler::new(settings);

    // Dropping the pipeline future kills running WiX tools and removes the
    // work directory.
    let artifact = tokio::select! {
        result = bundler.bundle() => result?,
        _ = tokio::signal::ctrl_c() => {
            output.interrupted()?;
            return Ok(INTERRUPTED);
        }
    };

    output.artifact(&artifact)?;
    Ok(0)
}
