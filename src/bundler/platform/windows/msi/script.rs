//! Installer definition rendering.
//!
//! Renders the project's WiX template with Handlebars. The template sees the
//! application version, the cabinet compression level and the generated
//! file list, plus the built-in `directory` partial for walking the tree.

use super::{
    filelist::FileList,
    template::{DIRECTORY_PARTIAL, DIRECTORY_PARTIAL_NAME},
};
use crate::bundler::{
    error::{Context, ErrorExt, Result},
    settings::MsiCompression,
    utils::fs,
};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name of the rendered definition.
pub const RENDERED_DEFINITION: &str = "project.wxs";

/// Values exposed to the template.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData<'a> {
    pub app_version: String,
    pub compression_level: &'static str,
    pub file_list: &'a FileList,
}

impl<'a> TemplateData<'a> {
    pub fn new(app_version: String, compression: MsiCompression, file_list: &'a FileList) -> Self {
        Self {
            app_version,
            compression_level: compression.as_str(),
            file_list,
        }
    }
}

/// XML attribute/text escaping for template substitutions.
fn xml_escape(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Render `template` with `data`.
pub fn render(template: &str, data: &TemplateData<'_>) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(xml_escape);
    handlebars.register_partial(DIRECTORY_PARTIAL_NAME, DIRECTORY_PARTIAL)?;
    handlebars.register_template_string("main.wxs", template)?;
    Ok(handlebars.render("main.wxs", data)?)
}

/// Render the template file and write the result into every directory in
/// `destinations`. Returns the path written under the first destination.
pub async fn write_definition(
    template_path: &Path,
    data: &TemplateData<'_>,
    destinations: &[&Path],
) -> Result<PathBuf> {
    let template = tokio::fs::read_to_string(template_path)
        .await
        .fs_context("reading installer template", template_path)?;
    let rendered = render(&template, data)
        .with_context(|| format!("rendering {}", template_path.display()))?;

    let targets: Vec<PathBuf> = destinations
        .iter()
        .map(|dir| dir.join(RENDERED_DEFINITION))
        .collect();
    let refs: Vec<&Path> = targets.iter().map(PathBuf::as_path).collect();
    fs::write_copies(&refs, rendered.as_bytes()).await?;

    targets
        .into_iter()
        .next()
        .context("no destination for the rendered definition")
}
