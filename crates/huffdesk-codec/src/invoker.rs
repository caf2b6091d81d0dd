//! Process-backed codec runner.
//!
//! # Design
//! - Argument-vector execution only; user-controlled names never reach a shell.
//! - Stdout and stderr are drained concurrently with `wait` so a chatty codec cannot
//!   block on a full pipe.
//! - One deadline covers the exit and both drains, so a descendant holding the pipes
//!   open cannot stretch a run past the timeout.
//! - On timeout the child is killed and reaped before returning; `kill_on_drop` covers
//!   cancellation of the calling future.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::time;
use tracing::{debug, info, warn};

use crate::error::{CodecError, CodecResult};
use crate::model::{CodecOutput, CodecRequest};

/// Wall-clock bound applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const REAP_GRACE: Duration = Duration::from_secs(2);

/// Seam between job orchestration and the codec process.
#[async_trait]
pub trait CodecRunner: Send + Sync {
    /// Run the codec for `request` and return its captured output.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when the run cannot start, times out or exits unsuccessfully.
    async fn run(&self, request: &CodecRequest) -> CodecResult<CodecOutput>;
}

/// Runs the codec executable as a child process.
#[derive(Debug, Clone)]
pub struct CodecInvoker {
    program: PathBuf,
    working_dir: Option<PathBuf>,
    timeout: Duration,
}

impl CodecInvoker {
    /// Invoker for `program` with the default timeout and inherited working directory.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Run the codec from `dir`.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replace the wall-clock bound.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executable being run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Configured wall-clock bound.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, request: &CodecRequest) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

#[async_trait]
impl CodecRunner for CodecInvoker {
    async fn run(&self, request: &CodecRequest) -> CodecResult<CodecOutput> {
        let started = Instant::now();
        let mode = request.mode.as_str();
        debug!(
            mode,
            program = %self.program.display(),
            input = %request.input.display(),
            output = %request.output.display(),
            "starting codec"
        );

        let mut child = self
            .command(request)
            .spawn()
            .map_err(|source| CodecError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let bounded = time::timeout(
            self.timeout,
            wait_and_drain(
                &mut child,
                stdout_pipe.as_mut(),
                stderr_pipe.as_mut(),
                &mut stdout,
                &mut stderr,
            ),
        )
        .await;

        match bounded {
            Ok(Ok(status)) => {
                let stdout = lossy(&stdout);
                let stderr = lossy(&stderr);
                let elapsed = started.elapsed();
                if status.success() {
                    info!(mode, elapsed_ms = millis(elapsed), "codec completed");
                    Ok(CodecOutput {
                        stdout,
                        stderr,
                        elapsed,
                    })
                } else {
                    warn!(
                        mode,
                        exit_code = ?status.code(),
                        elapsed_ms = millis(elapsed),
                        "codec exited unsuccessfully"
                    );
                    Err(CodecError::ExitStatus {
                        code: status.code(),
                        stdout,
                        stderr,
                    })
                }
            }
            Ok(Err(err)) => Err(err),
            Err(_elapsed) => {
                // The child may already have exited while a descendant still holds the pipes.
                let kill_success = child.kill().await.is_ok();
                let reap_success = time::timeout(REAP_GRACE, child.wait()).await.is_ok();
                let drained = time::timeout(
                    REAP_GRACE,
                    drain_into(stdout_pipe.as_mut(), &mut stdout),
                )
                .await
                .is_ok();
                warn!(
                    mode,
                    timeout_ms = millis(self.timeout),
                    kill_success,
                    reap_success,
                    drained,
                    "codec timed out; child killed"
                );
                Err(CodecError::Timeout {
                    timeout: self.timeout,
                    partial_stdout: lossy(&stdout),
                })
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

async fn wait_and_drain(
    child: &mut Child,
    stdout_pipe: Option<&mut ChildStdout>,
    stderr_pipe: Option<&mut ChildStderr>,
    stdout: &mut Vec<u8>,
    stderr: &mut Vec<u8>,
) -> CodecResult<ExitStatus> {
    let (status, stdout_read, stderr_read) = tokio::join!(
        child.wait(),
        drain_into(stdout_pipe, stdout),
        drain_into(stderr_pipe, stderr),
    );
    stdout_read.map_err(|source| CodecError::Io {
        operation: "read_stdout",
        source,
    })?;
    stderr_read.map_err(|source| CodecError::Io {
        operation: "read_stderr",
        source,
    })?;
    status.map_err(|source| CodecError::Io {
        operation: "wait_codec",
        source,
    })
}

/// Reads `pipe` to end of stream; bytes read before cancellation stay in `buffer`.
async fn drain_into<R>(pipe: Option<&mut R>, buffer: &mut Vec<u8>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(());
    };
    let mut chunk = [0_u8; 8192];
    loop {
        let read = pipe.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::model::CodecMode;
    use anyhow::Result;
    use huffdesk_test_support::{FakeCodec, recorded_args};
    use tempfile::TempDir;

    fn compress_request(temp: &TempDir) -> CodecRequest {
        CodecRequest {
            mode: CodecMode::Compress,
            input: temp.path().join("in put; $(rm -rf).txt"),
            output: temp.path().join("out.huf"),
        }
    }

    #[tokio::test]
    async fn successful_run_captures_stdout() -> Result<()> {
        let temp = TempDir::new()?;
        let program = FakeCodec::Succeed.install(temp.path(), "huff")?;
        let request = compress_request(&temp);

        let output = CodecInvoker::new(&program).run(&request).await?;
        assert!(output.stdout.contains("Original size: 11 bytes"));
        assert!(output.stderr.is_empty());
        assert_eq!(std::fs::read(&request.output)?, b"HUFF");

        let args = recorded_args(&program)?;
        let expected: Vec<String> = request
            .args()
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, expected);
        Ok(())
    }

    #[tokio::test]
    async fn extract_run_writes_into_directory() -> Result<()> {
        let temp = TempDir::new()?;
        let program = FakeCodec::Succeed.install(temp.path(), "huff")?;
        let request = CodecRequest {
            mode: CodecMode::Extract,
            input: temp.path().join("bundle.huf"),
            output: temp.path().join("restored"),
        };
        let output = CodecInvoker::new(&program).run(&request).await?;
        assert!(output.stdout.contains("Number of files: 2"));
        assert!(request.output.join("a.txt").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn nonzero_exit_keeps_captured_text() -> Result<()> {
        let temp = TempDir::new()?;
        let program = FakeCodec::Fail {
            code: 3,
            stdout: "Original size: 7 bytes".to_string(),
            stderr: "Error: cannot open input".to_string(),
        }
        .install(temp.path(), "huff")?;

        let err = CodecInvoker::new(&program)
            .run(&compress_request(&temp))
            .await;
        match err {
            Err(CodecError::ExitStatus {
                code,
                stdout,
                stderr,
            }) => {
                assert_eq!(code, Some(3));
                assert!(stdout.contains("Original size: 7 bytes"));
                assert!(stderr.contains("cannot open input"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn hanging_codec_is_killed_at_the_timeout() -> Result<()> {
        let temp = TempDir::new()?;
        let program = FakeCodec::Hang {
            stdout: "Reading file: big.bin".to_string(),
        }
        .install(temp.path(), "huff")?;
        let invoker = CodecInvoker::new(&program).with_timeout(Duration::from_millis(300));

        let started = Instant::now();
        let err = invoker.run(&compress_request(&temp)).await;
        assert!(started.elapsed() < Duration::from_secs(10));
        match err {
            Err(CodecError::Timeout {
                timeout,
                partial_stdout,
            }) => {
                assert_eq!(timeout, Duration::from_millis(300));
                assert!(partial_stdout.contains("Reading file: big.bin"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn lingering_descendant_cannot_outlast_the_timeout() -> Result<()> {
        let temp = TempDir::new()?;
        let program = FakeCodec::Linger {
            stdout: "Original size: 1 bytes".to_string(),
        }
        .install(temp.path(), "huff")?;
        let invoker = CodecInvoker::new(&program).with_timeout(Duration::from_millis(500));

        let started = Instant::now();
        let err = invoker.run(&compress_request(&temp)).await;
        assert!(started.elapsed() < REAP_GRACE * 3);
        match err {
            Err(CodecError::Timeout { partial_stdout, .. }) => {
                assert!(partial_stdout.contains("Original size: 1 bytes"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() -> Result<()> {
        let temp = TempDir::new()?;
        let invoker = CodecInvoker::new(temp.path().join("absent"));
        let err = invoker.run(&compress_request(&temp)).await;
        assert!(matches!(err, Err(CodecError::Spawn { .. })));
        Ok(())
    }

    #[test]
    fn builder_overrides_defaults() {
        let invoker = CodecInvoker::new("huff")
            .with_timeout(Duration::from_secs(5))
            .with_working_dir("/opt/huff");
        assert_eq!(invoker.timeout(), Duration::from_secs(5));
        assert_eq!(invoker.program(), Path::new("huff"));
        assert_eq!(CodecInvoker::new("huff").timeout(), DEFAULT_TIMEOUT);
    }
}
