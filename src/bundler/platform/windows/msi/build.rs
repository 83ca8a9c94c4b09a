//! WiX compile and link execution.
//!
//! Every definition file is compiled by `candle.exe` into its own object file
//! in the work directory. Compiles run concurrently, bounded by the `jobs`
//! setting, and the first failure cancels the rest. The objects are then
//! linked by a single `light.exe` run into the MSI.

use crate::{
    bail,
    bundler::{
        error::{Context, Error, ErrorExt, Result},
        settings::{Settings, WixSettings},
        utils::process,
    },
};
use std::{
    collections::HashSet,
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{sync::Semaphore, task::JoinSet};

/// `-dappDir=<dir>`, the preprocessor variable templates use for `File/@Source`.
fn app_dir_define(app_dir: &Path) -> OsString {
    let mut define = OsString::from("-dappDir=");
    define.push(app_dir);
    define
}

/// Object file for `input`: `<work_dir>/<stem>.wixobj`.
pub fn object_path(work_dir: &Path, input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .with_context(|| format!("definition file has no name: {}", input.display()))?;
    let mut name = stem.to_os_string();
    name.push(".wixobj");
    Ok(work_dir.join(name))
}

/// Arguments for compiling `input` into `output`.
pub fn compile_args(wix: &WixSettings, app_dir: &Path, input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-arch".into(),
        wix.arch.wix_name().into(),
        app_dir_define(app_dir),
        "-nologo".into(),
        "-out".into(),
        output.into(),
        "-pedantic".into(),
        "-wx".into(),
        input.into(),
    ]
}

/// Arguments for linking `objects` into `output`.
pub fn link_args(
    wix: &WixSettings,
    app_dir: &Path,
    cab_cache: &Path,
    objects: &[PathBuf],
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = wix
        .suppressed_ices
        .iter()
        .map(|ice| format!("-sice:{ice}").into())
        .collect();
    args.push(app_dir_define(app_dir));
    for ext in &wix.extensions {
        args.push("-ext".into());
        args.push(ext.into());
    }
    args.extend([
        "-nologo".into(),
        "-out".into(),
        output.into(),
        "-pedantic".into(),
        "-wx".into(),
        "-cc".into(),
        cab_cache.into(),
        "-reusecab".into(),
    ]);
    args.extend(objects.iter().map(OsString::from));
    args
}

/// Compile every input, returning the object files in input order.
pub async fn compile_all(
    settings: &Settings,
    app_dir: &Path,
    work_dir: &Path,
    inputs: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let objects = inputs
        .iter()
        .map(|input| object_path(work_dir, input))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    if let Some(dup) = objects.iter().find(|o| !seen.insert(o.as_path())) {
        bail!("two definition files compile to {}", dup.display());
    }

    let compiler = settings.wix().compiler();
    let permits = Arc::new(Semaphore::new(concurrency(settings.jobs(), inputs.len())));
    let mut tasks = JoinSet::new();

    for (input, object) in inputs.iter().zip(&objects) {
        let args = compile_args(settings.wix(), app_dir, input, object);
        let compiler = compiler.clone();
        let permits = Arc::clone(&permits);
        let input = input.clone();
        tasks.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| Error::GenericError(e.to_string()))?;
            log::debug!("Compiling {}", input.display());
            process::run(&compiler, args)
                .await
                .with_context(|| format!("compiling {}", input.display()))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = outcome {
            tasks.abort_all();
            while tasks.join_next().await.is_some() {}
            return Err(e);
        }
    }

    Ok(objects)
}

/// Compiler processes allowed at once: never more than there are inputs.
fn concurrency(jobs: usize, inputs: usize) -> usize {
    jobs.min(inputs).min(Semaphore::MAX_PERMITS)
}

/// Link `objects` into the MSI at `output`.
pub async fn link(
    settings: &Settings,
    app_dir: &Path,
    objects: &[PathBuf],
    output: &Path,
) -> Result<()> {
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating installer output directory", parent)?;
    }
    let cab_cache = settings.cab_cache();
    tokio::fs::create_dir_all(&cab_cache)
        .await
        .fs_context("creating cabinet cache", &cab_cache)?;

    let args = link_args(settings.wix(), app_dir, &cab_cache, objects, output);
    process::run(&settings.wix().linker(), args)
        .await
        .context("linking installer")
}
