use std::process::Stdio;

use bootplot_core::{AnalyzeCommand, BootError, OutputBuffer};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

const CHUNK_SIZE: usize = 8 * 1024;

/// Runs the analyzer and returns its complete stdout.
pub async fn run_analyzer(command: &AnalyzeCommand) -> Result<String, BootError> {
    run_argv(command.argv()).await
}

/// Stdout is read chunk by chunk while stderr is drained alongside, so a chatty child
/// never stalls on a full pipe. A non-zero exit reports the child's stderr.
pub async fn run_argv(argv: &[String]) -> Result<String, BootError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| BootError::Invocation("empty analyzer command".to_string()))?;

    tracing::debug!(command = %argv.join(" "), "spawning analyzer");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|err| BootError::Invocation(format!("{program}: {err}")))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| BootError::Invocation("analyzer stdout was not captured".to_string()))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| BootError::Invocation("analyzer stderr was not captured".to_string()))?;

    let read_stdout = async {
        let mut buffer = OutputBuffer::default();
        let mut chunk = vec![0u8; CHUNK_SIZE];
        loop {
            let read = stdout.read(&mut chunk).await?;
            if read == 0 {
                break;
            }
            buffer.push_bytes(&chunk[..read]);
        }
        Ok::<_, std::io::Error>(buffer)
    };
    let read_stderr = async {
        let mut text = String::new();
        stderr.read_to_string(&mut text).await.map(|_| text)
    };

    let (stdout_result, stderr_result) = tokio::join!(read_stdout, read_stderr);
    let status = child
        .wait()
        .await
        .map_err(|err| BootError::Invocation(format!("{program}: {err}")))?;
    let buffer = stdout_result
        .map_err(|err| BootError::Invocation(format!("reading {program} output: {err}")))?;
    let stderr_text = stderr_result.unwrap_or_default();

    if !status.success() {
        let message = stderr_text.trim();
        return Err(BootError::Invocation(if message.is_empty() {
            format!("{program} exited with {status}")
        } else {
            message.to_string()
        }));
    }

    tracing::debug!(
        bytes = buffer.len(),
        chunks = buffer.chunk_count(),
        "analyzer finished"
    );
    buffer.finish()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn collects_streamed_stdout() {
        let output = run_argv(&sh("printf '<svg>'; sleep 0.05; printf '<g/></svg>'"))
            .await
            .expect("child succeeds");
        assert_eq!(output, "<svg><g/></svg>");
    }

    #[tokio::test]
    async fn failure_surfaces_stderr_text() {
        let err = run_argv(&sh("echo 'command not found' >&2; exit 127"))
            .await
            .expect_err("child fails");
        assert_eq!(err, BootError::Invocation("command not found".to_string()));
        assert_eq!(err.to_string(), "command not found");
    }

    #[tokio::test]
    async fn silent_failure_reports_exit_status() {
        let err = run_argv(&sh("exit 3")).await.expect_err("child fails");
        let text = err.to_string();
        assert!(text.starts_with("sh exited with"), "{text}");
    }

    #[tokio::test]
    async fn missing_program_is_invocation_error() {
        let err = run_argv(&["bootplot-no-such-analyzer".to_string()])
            .await
            .expect_err("spawn fails");
        assert!(matches!(err, BootError::Invocation(_)));
    }
}
