use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::languages::Language;

/// Code execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Programming language
    pub language: Language,
    /// Source code to execute
    pub code: String,
    /// Input data for the program
    #[serde(default)]
    pub input: Option<StdinPayload>,
    /// Execution timeout
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
}

/// Program input, accepted either as a single string or as an ordered
/// sequence of lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StdinPayload {
    Text(String),
    Lines(Vec<String>),
}

impl StdinPayload {
    /// Form written to a piped child: lines joined with newlines and
    /// terminated with one, so line-reading programs see end-of-input.
    pub fn piped(&self) -> String {
        match self {
            StdinPayload::Text(text) => format!("{}\n", text),
            StdinPayload::Lines(lines) => format!("{}\n", lines.join("\n")),
        }
    }

    /// Whitespace-separated tokens appended to an argv-convention command
    pub fn argv(&self) -> Vec<String> {
        match self {
            StdinPayload::Text(text) => {
                text.split_whitespace().map(str::to_string).collect()
            }
            StdinPayload::Lines(lines) => lines
                .iter()
                .flat_map(|line| line.split_whitespace())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Terminal classification of one execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Program exited with code 0; `stdout` is the payload
    Success {
        stdout: String,
        stderr: String,
        /// True when either stream hit the capture cap
        truncated: bool,
    },
    /// Compiler exited nonzero or the compile stage timed out
    CompileError { diagnostics: String },
    /// Program exited nonzero or died on a signal
    RuntimeError { stderr: String, exit_code: i32 },
    /// Wall-clock ceiling exceeded; the child was killed
    Timeout {
        #[serde(with = "duration_serde")]
        after: Duration,
    },
}

impl Outcome {
    /// Short label used for logging and status fields
    pub fn status_label(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "success",
            Outcome::CompileError { .. } => "compile_error",
            Outcome::RuntimeError { .. } => "runtime_error",
            Outcome::Timeout { .. } => "timeout",
        }
    }
}

/// Resource ceilings applied to every execution
#[derive(Debug, Clone)]
pub struct ExecutionLimits {
    /// Wall-clock ceiling for the compile stage
    pub compile_timeout: Duration,
    /// Wall-clock ceiling for the run stage; request timeouts are clamped
    /// to this value
    pub run_timeout: Duration,
    /// Capture cap per output stream, in bytes
    pub max_output_bytes: u64,
    /// CPU seconds granted to the child (RLIMIT_CPU)
    pub cpu_time: u64,
    /// Largest file the child may create (RLIMIT_FSIZE), in bytes
    pub file_size: u64,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            compile_timeout: Duration::from_secs(15),
            run_timeout: Duration::from_secs(30),
            max_output_bytes: 1024 * 1024, // 1MB per stream
            cpu_time: 30,
            file_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
