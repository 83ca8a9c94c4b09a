//! Colored terminal output for packaging runs.
//!
//! Progress goes through `log`; this covers the framing a person reads: the
//! run header, the installer summary and the failure report.

use crate::{
    bundler::{BundledArtifact, Settings},
    error::BundlerError,
};
use std::io::{self, Write};
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Width of the label column in the header and summary.
const LABEL_WIDTH: usize = 8;

/// Terminal framing around a packaging run
#[derive(Debug)]
pub struct OutputManager {
    stdout: BufferWriter,
    quiet: bool,
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(quiet: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            quiet,
        }
    }

    /// Print where the run reads from and writes to
    pub fn header(&self, settings: &Settings) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.stdout.buffer();
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        writeln!(&mut buffer, "Packaging MSI ({})", settings.wix().arch)?;
        buffer.reset()?;
        labeled(&mut buffer, "dist", &settings.dist_dir().display())?;
        labeled(&mut buffer, "output", &settings.output_dir().display())?;
        labeled(&mut buffer, "wix", &settings.wix().toolset_dir.display())?;
        self.stdout.print(&buffer)
    }

    /// Print the installer summary
    pub fn artifact(&self, artifact: &BundledArtifact) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.stdout.buffer();
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        writeln!(&mut buffer, "Created installer")?;
        buffer.reset()?;
        labeled(&mut buffer, "path", &artifact.path.display())?;
        labeled(&mut buffer, "size", &format!("{} bytes", artifact.size))?;
        labeled(&mut buffer, "sha256", &artifact.checksum)?;
        self.stdout.print(&buffer)
    }

    /// Note that the run was cancelled
    pub fn interrupted(&self) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.stdout.buffer();
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        writeln!(&mut buffer, "Interrupted, work directory removed")?;
        buffer.reset()?;
        self.stdout.print(&buffer)
    }

    /// Report a failed run on stderr (always shown)
    pub fn failure(&self, error: &BundlerError) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = stderr.buffer();

        if write_failure(&mut buffer, error).is_err() || stderr.print(&buffer).is_err() {
            eprintln!("Error: {error}");
            for suggestion in error.recovery_suggestions() {
                eprintln!("  {suggestion}");
            }
        }
    }
}

fn labeled(buffer: &mut Buffer, label: &str, value: &dyn std::fmt::Display) -> io::Result<()> {
    buffer.set_color(ColorSpec::new().set_dimmed(true))?;
    write!(buffer, "  {:<LABEL_WIDTH$}", format!("{label}:"))?;
    buffer.reset()?;
    writeln!(buffer, "{value}")
}

fn write_failure(buffer: &mut Buffer, error: &BundlerError) -> io::Result<()> {
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(buffer, "Error:")?;
    buffer.reset()?;
    writeln!(buffer, " {error}")?;
    for suggestion in error.recovery_suggestions() {
        writeln!(buffer, "  {suggestion}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::path::PathBuf;

    fn text(buffer: Buffer) -> String {
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_labels_line_up() {
        let mut buffer = Buffer::no_color();
        labeled(&mut buffer, "size", &"3 bytes").unwrap();
        labeled(&mut buffer, "sha256", &"ab").unwrap();
        assert_eq!(text(buffer), "  size:   3 bytes\n  sha256: ab\n");
    }

    #[test]
    fn test_failure_lists_suggestions() {
        let error = BundlerError::from(CliError::InvalidArguments {
            reason: "--jobs must be at least 1".to_string(),
        });
        let mut buffer = Buffer::no_color();
        write_failure(&mut buffer, &error).unwrap();

        let text = text(buffer);
        assert!(text.starts_with("Error: "));
        assert!(text.contains("--jobs must be at least 1"));
        assert!(text.ends_with("  Run with --help for usage\n"));
    }

    #[test]
    fn test_quiet_prints_nothing() {
        let output = OutputManager::new(true);
        let artifact = BundledArtifact {
            path: PathBuf::from("Widget Setup 1.0.0.msi"),
            size: 3,
            checksum: "00".repeat(32),
        };
        output.artifact(&artifact).unwrap();
        output.interrupted().unwrap();
    }
}
