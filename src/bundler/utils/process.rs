//! External tool execution.
//!
//! Tools run with inherited stdio so their own diagnostics reach the
//! operator unchanged. A non-zero exit is an error; nothing is retried.

use crate::bundler::{Error, Result};
use std::{
    ffi::{OsStr, OsString},
    path::Path,
    process::Stdio,
};
use tokio::process::Command;

/// Run `program` with `args` and wait for it to exit.
///
/// The child is killed if the returned future is dropped before it exits,
/// which is how a failed sibling in a fan-out cancels the rest.
pub async fn run<I, S>(program: &Path, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args
        .into_iter()
        .map(|a| a.as_ref().to_os_string())
        .collect();
    let command = program.display().to_string();
    log::debug!("Running {}", command_line(&command, &args));

    let status = Command::new(program)
        .args(&args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|error| Error::CommandFailed {
            command: command.clone(),
            error,
        })?;

    if !status.success() {
        return Err(Error::ExternalProcess { command, status });
    }
    Ok(())
}

fn command_line(command: &str, args: &[OsString]) -> String {
    args.iter().fold(command.to_string(), |mut line, arg| {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
        line
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success() {
        run(Path::new("true"), std::iter::empty::<&str>()).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_external_process_error() {
        let err = run(Path::new("sh"), ["-c", "exit 3"]).await.unwrap_err();
        match err {
            Error::ExternalProcess { command, status } => {
                assert_eq!(command, "sh");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = run(Path::new("/nonexistent/tool"), ["x"]).await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[test]
    fn test_command_line() {
        let args = vec![OsString::from("-d"), OsString::from("/tmp/a b")];
        assert_eq!(command_line("unzip", &args), "unzip -d /tmp/a b");
    }
}
