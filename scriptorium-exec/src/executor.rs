use std::process::Stdio;
use std::time::Duration;

use tokio::io::{self, AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::time;
use tracing::{debug, warn};

use crate::error::Error;
use crate::languages::{self, LanguageProfile, StdinMode, ToolCommand};
use crate::types::{ExecutionLimits, ExecutionRequest, Outcome};
use crate::workspace::Workspace;

/// Drives one submission through staging, compilation and execution.
///
/// User-caused failures (compile errors, runtime errors, timeouts) come
/// back as [`Outcome`] variants; `Err` is reserved for rejected requests
/// and infrastructure faults.
pub struct CodeExecutor {
    limits: ExecutionLimits,
}

enum CompileResult {
    Ok,
    Failed(String),
}

impl CodeExecutor {
    pub fn new(limits: ExecutionLimits) -> Self {
        Self { limits }
    }

    pub async fn execute(&self, request: &ExecutionRequest) -> Result<Outcome, Error> {
        let profile = languages::resolve(request.language);
        let mut workspace = Workspace::create(profile.as_ref(), &request.code).await?;

        if let Some(compile) = profile.compile_command(workspace.source_file()) {
            match self.run_compiler(&workspace, compile).await? {
                CompileResult::Ok => {
                    if let Some(artifact) = profile.artifact_name(workspace.source_file()) {
                        workspace.set_artifact(artifact);
                    }
                    debug!(artifact = ?workspace.artifact(), "compilation succeeded");
                }
                CompileResult::Failed(diagnostics) => {
                    return Ok(Outcome::CompileError { diagnostics });
                }
            }
        }

        let deadline = request.timeout.min(self.limits.run_timeout);
        self.run_program(&workspace, profile.as_ref(), request, deadline)
            .await
    }

    /// Compile stage: bounded by its own timeout, diagnostics taken from
    /// the compiler's stderr. A nonzero exit short-circuits the pipeline.
    async fn run_compiler(
        &self,
        workspace: &Workspace,
        cmd: ToolCommand,
    ) -> Result<CompileResult, Error> {
        debug!(program = %cmd.program, args = ?cmd.args, "compiling submission");
        let mut child = self.spawn(workspace, &cmd, Stdio::null())?;

        let captured = match time::timeout(
            self.limits.compile_timeout,
            capture(&mut child, self.limits.max_output_bytes),
        )
        .await
        {
            Ok(captured) => captured?,
            Err(_) => {
                kill(&mut child).await;
                return Ok(CompileResult::Failed("compilation timed out".to_string()));
            }
        };

        if captured.status.success() {
            Ok(CompileResult::Ok)
        } else {
            Ok(CompileResult::Failed(captured.stderr))
        }
    }

    /// Run stage: feeds input per the language's convention, captures both
    /// streams bounded, and kills the child when the deadline expires.
    async fn run_program(
        &self,
        workspace: &Workspace,
        profile: &dyn LanguageProfile,
        request: &ExecutionRequest,
        deadline: Duration,
    ) -> Result<Outcome, Error> {
        let mut cmd = profile.run_command(workspace.source_file());

        let piped_input = match (profile.stdin_mode(), request.input.as_ref()) {
            (StdinMode::Argv, Some(input)) => {
                cmd.args.extend(input.argv());
                None
            }
            (StdinMode::Piped, Some(input)) => Some(input.piped()),
            (_, None) => None,
        };

        debug!(program = %cmd.program, args = ?cmd.args, "running submission");
        let stdin = if piped_input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        let mut child = self.spawn(workspace, &cmd, stdin)?;

        let cap = self.limits.max_output_bytes;
        let fed_and_captured = async {
            if let Some(text) = piped_input {
                if let Some(mut stdin) = child.stdin.take() {
                    if let Err(e) = stdin.write_all(text.as_bytes()).await {
                        // A program that exits without reading its input is
                        // not a fault; its own exit status tells the story.
                        if e.kind() != std::io::ErrorKind::BrokenPipe {
                            return Err(Error::Io(e));
                        }
                    }
                    // dropping the handle closes the stream and signals EOF
                }
            }
            capture(&mut child, cap).await
        };

        let captured = match time::timeout(deadline, fed_and_captured).await {
            Ok(captured) => captured?,
            Err(_) => {
                kill(&mut child).await;
                return Ok(Outcome::Timeout { after: deadline });
            }
        };

        if captured.status.success() {
            return Ok(Outcome::Success {
                stdout: captured.stdout,
                stderr: captured.stderr,
                truncated: captured.truncated,
            });
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = captured.status.signal() {
                // RLIMIT_CPU expiry arrives as SIGXCPU or SIGKILL rather
                // than a wall-clock expiry
                if signal == 9 || signal == 24 {
                    return Ok(Outcome::Timeout { after: deadline });
                }
                let stderr = if captured.stderr.is_empty() {
                    format!("process terminated by signal {}", signal)
                } else {
                    captured.stderr
                };
                return Ok(Outcome::RuntimeError {
                    stderr,
                    exit_code: -1,
                });
            }
        }

        Ok(Outcome::RuntimeError {
            stderr: captured.stderr,
            exit_code: captured.status.code().unwrap_or(-1),
        })
    }

    /// Spawn a tool inside the workspace: cleared environment, minimal
    /// PATH, piped output, rlimits applied in the child before exec.
    fn spawn(
        &self,
        workspace: &Workspace,
        cmd: &ToolCommand,
        stdin: Stdio,
    ) -> Result<Child, Error> {
        let program = if cmd.program.starts_with("./") {
            workspace.root_dir().join(&cmd.program)
        } else {
            which::which(&cmd.program)
                .map_err(|_| Error::Internal(format!("command not found: {}", cmd.program)))?
        };

        let mut command = Command::new(&program);
        command
            .args(&cmd.args)
            .env_clear()
            .env("PATH", "/usr/bin:/bin:/usr/sbin:/sbin")
            .current_dir(workspace.root_dir())
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        {
            use nix::sys::resource::{setrlimit, Resource};

            let cpu_time = self.limits.cpu_time;
            let file_size = self.limits.file_size;
            unsafe {
                command.pre_exec(move || {
                    setrlimit(Resource::RLIMIT_CPU, cpu_time, cpu_time).map_err(|e| {
                        std::io::Error::new(
                            std::io::ErrorKind::Other,
                            format!("failed to set CPU time limit: {}", e),
                        )
                    })?;
                    setrlimit(Resource::RLIMIT_FSIZE, file_size, file_size).map_err(|e| {
                        std::io::Error::new(
                            std::io::ErrorKind::Other,
                            format!("failed to set file size limit: {}", e),
                        )
                    })?;
                    Ok(())
                });
            }
        }

        command
            .spawn()
            .map_err(|e| Error::Internal(format!("failed to spawn {}: {}", cmd.program, e)))
    }
}

struct Captured {
    status: std::process::ExitStatus,
    stdout: String,
    stderr: String,
    truncated: bool,
}

/// Read both output streams concurrently, bounded per stream, then reap
/// the child.
async fn capture(child: &mut Child, cap: u64) -> Result<Captured, Error> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (stdout, stderr) = tokio::join!(read_capped(stdout, cap), read_capped(stderr, cap));
    let (stdout, stdout_truncated) = stdout?;
    let (stderr, stderr_truncated) = stderr?;

    let status = child
        .wait()
        .await
        .map_err(|e| Error::Internal(format!("process wait failed: {}", e)))?;

    Ok(Captured {
        status,
        stdout,
        stderr,
        truncated: stdout_truncated || stderr_truncated,
    })
}

/// Buffer at most `cap` bytes of a stream; everything past the cap is
/// drained to the sink so the child never wedges on a full pipe.
async fn read_capped<R>(stream: Option<R>, cap: u64) -> Result<(String, bool), Error>
where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return Ok((String::new(), false));
    };

    let mut limited = stream.take(cap);
    let mut buf = Vec::new();
    limited.read_to_end(&mut buf).await.map_err(Error::Io)?;

    let drained = io::copy(&mut limited.into_inner(), &mut io::sink())
        .await
        .map_err(Error::Io)?;

    Ok((String::from_utf8_lossy(&buf).into_owned(), drained > 0))
}

/// Force-terminate a child and reap it so nothing outlives the request
async fn kill(child: &mut Child) {
    if let Err(e) = child.kill().await {
        if e.kind() != std::io::ErrorKind::InvalidInput {
            warn!("failed to kill timed-out process: {}", e);
        }
    }
}
