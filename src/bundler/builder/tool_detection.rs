//! External tool availability checking.
//!
//! Runs before the work directory is created so a missing toolset fails the
//! run without touching the filesystem.

use crate::{
    bundler::{Error, Result, Settings},
    source::Extractor,
};
use std::path::Path;

async fn require_file(tool: &Path, hint: &str) -> Result<()> {
    match tokio::fs::metadata(tool).await {
        Ok(meta) if meta.is_file() => {
            log::debug!("Found {}", tool.display());
            Ok(())
        }
        _ => Err(Error::ToolNotFound {
            tool: tool.display().to_string(),
            hint: hint.to_string(),
        }),
    }
}

/// Verify the WiX compiler and linker exist and the extractor can be resolved.
pub async fn preflight(settings: &Settings) -> Result<()> {
    let wix = settings.wix();
    let hint = format!(
        "expected the WiX 3 toolset in {} (set --wix-dir)",
        wix.toolset_dir.display()
    );
    require_file(&wix.compiler(), &hint).await?;
    require_file(&wix.linker(), &hint).await?;

    if let Extractor::External(tool) = settings.extractor() {
        match which::which(tool) {
            Ok(path) => log::debug!("Using extractor {}", path.display()),
            Err(e) => {
                return Err(Error::ToolNotFound {
                    tool: tool.display().to_string(),
                    hint: format!("{e} (install unzip or use --extractor builtin)"),
                });
            }
        }
    }
    Ok(())
}
