// Subprocess helpers shared by the extractor and tool probes

use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be found
    #[error("{0} not found")]
    NotFound(String),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed while running {program}: {message}")]
    Io { program: String, message: String },

    #[error("{program} timed out after {after:?}")]
    TimedOut { program: String, after: Duration },
}

/// Run `program` to completion and capture stdout and stderr.
///
/// Both pipes are drained concurrently so a chatty child cannot block on a
/// full pipe. With `limit = None` the call waits indefinitely.
pub async fn run_output(
    program: &str,
    args: &[String],
    limit: Option<Duration>,
) -> Result<Output, CommandError> {
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CommandError::NotFound(program.to_string()),
            _ => CommandError::Spawn {
                program: program.to_string(),
                source: e,
            },
        })?;

    let io_error = |message: String| CommandError::Io {
        program: program.to_string(),
        message,
    };

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| io_error("stdout not captured".to_string()))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| io_error("stderr not captured".to_string()))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });

    let status = match limit {
        Some(after) => match timeout(after, child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(CommandError::TimedOut {
                    program: program.to_string(),
                    after,
                });
            }
        },
        None => child.wait().await,
    }
    .map_err(|e| io_error(e.to_string()))?;

    let stdout = stdout_task
        .await
        .map_err(|e| io_error(e.to_string()))?
        .map_err(|e| io_error(e.to_string()))?;
    let stderr = stderr_task
        .await
        .map_err(|e| io_error(e.to_string()))?
        .map_err(|e| io_error(e.to_string()))?;

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// Last non-empty lines of tool output, joined for one-line error messages.
pub fn tail_lines(output: &[u8], max: usize) -> String {
    let text = String::from_utf8_lossy(output);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(max);
    lines[start..].join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_not_found() {
        let err = run_output("definitely-not-a-real-binary-ytf", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_program_times_out() {
        let started = std::time::Instant::now();
        let err = run_output("sleep", &["5".to_string()], Some(Duration::from_millis(100)))
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::TimedOut { ref program, .. } if program == "sleep"));
        assert_eq!(err.to_string(), "sleep timed out after 100ms");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_output_within_limit() {
        let output = run_output("echo", &["hello".to_string()], Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[test]
    fn tail_keeps_last_meaningful_lines() {
        let out = b"WARNING: a\n\nERROR: b\nERROR: c\n  \n";
        assert_eq!(tail_lines(out, 2), "ERROR: b | ERROR: c");
        assert_eq!(tail_lines(b"", 3), "");
    }
}
