//! Windows MSI installer creation with the WiX 3 toolset.
//!
//! # Module Organization
//!
//! - `filelist` - application tree to template input
//! - `template` - built-in template partials
//! - `script` - definition rendering
//! - `build` - `candle.exe`/`light.exe` execution

pub mod build;
pub mod filelist;
pub mod script;
mod template;

use crate::{
    bundler::{
        error::{Context, Result},
        settings::Settings,
        utils::workdir::WorkDir,
    },
    metadata,
};
use std::path::PathBuf;

/// File name of the installer: `<display name> Setup <version>.msi`.
pub fn installer_file_name(display_name: &str, version: &metadata::NormalizedVersion) -> String {
    format!("{display_name} Setup {version}.msi")
}

/// Build the MSI from the application unpacked in `work_dir`.
///
/// # Process
///
/// 1. Read the version and display name from the packaged metadata
/// 2. Generate the file list for the application directory
/// 3. Render the template into the work dir and the output dir
/// 4. Compile the rendered definition and the static definitions
/// 5. Link the objects into the MSI
///
/// # Returns
///
/// Path to the generated `.msi` in the output directory
pub async fn build_installer(settings: &Settings, work_dir: &WorkDir) -> Result<PathBuf> {
    let app_dir = work_dir.app_dir();

    let meta = metadata::get_package_metadata(&app_dir).await?;
    let version = meta.app_version()?;
    let display_name = settings
        .display_name()
        .unwrap_or_else(|| meta.display_name())
        .to_string();
    log::info!("Building MSI for {display_name} {version}");

    let file_list = filelist::generate(&app_dir)
        .await
        .context("listing application files")?;

    log::info!("Writing out WiX definition...");
    let data = script::TemplateData::new(version.to_string(), settings.compression(), &file_list);
    let rendered = script::write_definition(
        &settings.wix().template,
        &data,
        &[work_dir.path(), settings.output_dir()],
    )
    .await?;

    log::info!("Compiling WiX...");
    let inputs: Vec<PathBuf> = std::iter::once(rendered)
        .chain(settings.wix().definitions.iter().cloned())
        .collect();
    let objects = build::compile_all(settings, &app_dir, work_dir.path(), &inputs).await?;

    log::info!("Linking WiX...");
    let installer = settings
        .output_dir()
        .join(installer_file_name(&display_name, &version));
    build::link(settings, &app_dir, &objects, &installer).await?;

    log::info!("Created MSI installer: {}", installer.display());
    Ok(installer)
}
