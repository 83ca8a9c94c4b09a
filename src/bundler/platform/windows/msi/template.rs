//! Built-in partials available to installer definition templates.

/// Name under which [`DIRECTORY_PARTIAL`] is registered.
pub const DIRECTORY_PARTIAL_NAME: &str = "directory";

/// Renders one [`DirectoryNode`](super::filelist::DirectoryNode) and,
/// recursively, everything below it.
///
/// Use from a template as `{{#each fileList.root.directories}}{{> directory}}{{/each}}`.
pub const DIRECTORY_PARTIAL: &str = r#"<Directory Id="{{id}}" Name="{{name}}">
{{#each files}}
  <Component Id="{{componentId}}" Guid="{{guid}}">
    <File Id="{{id}}" Name="{{name}}" Source="$(var.appDir){{source}}" KeyPath="yes" />
  </Component>
{{/each}}
{{#each directories}}
{{> directory}}
{{/each}}
</Directory>
"#;
