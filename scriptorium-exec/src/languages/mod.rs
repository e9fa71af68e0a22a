//! Per-language execution profiles

mod c;
mod cpp;
mod java;
mod javascript;
mod python;

pub use c::CProfile;
pub use cpp::CppProfile;
pub use java::JavaProfile;
pub use javascript::JavaScriptProfile;
pub use python::PythonProfile;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

/// Base name used for staged source files; Java overrides it with the
/// declared public class name.
pub(crate) const SOURCE_BASE_NAME: &str = "code";

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Java,
    C,
    Cpp,
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "javascript" => Ok(Language::JavaScript),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "cpp" => Ok(Language::Cpp),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// How program input reaches the child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
    /// Input is written to the child's stdin, then the stream is closed
    Piped,
    /// Input tokens are appended to the run command's argument list
    Argv,
}

/// A program invocation staged inside a workspace
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Per-language execution profile: file naming, compile/run commands and
/// the input-passing convention. Implementations are stateless and
/// process-wide; all paths are relative to the workspace root.
pub trait LanguageProfile: Send + Sync {
    /// Language this profile serves
    fn language(&self) -> Language;

    /// Source file extension
    fn extension(&self) -> &'static str;

    /// File name the submission must be staged under. Overridden where the
    /// toolchain constrains the name (Java's public class rule); validation
    /// happens here, before any filesystem work.
    fn source_file_name(&self, code: &str) -> Result<String, Error> {
        let _ = code;
        Ok(format!("{}.{}", SOURCE_BASE_NAME, self.extension()))
    }

    /// Compile invocation, `None` for interpreted languages
    fn compile_command(&self, source_file: &Path) -> Option<ToolCommand> {
        let _ = source_file;
        None
    }

    /// Artifact the compile stage leaves in the workspace root
    fn artifact_name(&self, source_file: &Path) -> Option<String> {
        let _ = source_file;
        None
    }

    /// Run invocation for the staged (and possibly compiled) submission
    fn run_command(&self, source_file: &Path) -> ToolCommand;

    /// Input convention for this language
    fn stdin_mode(&self) -> StdinMode {
        StdinMode::Piped
    }
}

/// Resolve the profile for a language. Pure lookup, no side effects.
pub fn resolve(language: Language) -> Box<dyn LanguageProfile> {
    match language {
        Language::Python => Box::new(PythonProfile),
        Language::JavaScript => Box::new(JavaScriptProfile),
        Language::Java => Box::new(JavaProfile),
        Language::C => Box::new(CProfile),
        Language::Cpp => Box::new(CppProfile),
    }
}

/// File stem of a staged source file; for Java this is the class name.
pub(crate) fn source_stem(source_file: &Path) -> String {
    source_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_case_insensitively() {
        assert_eq!("PYTHON".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("JavaScript".parse::<Language>().unwrap(), Language::JavaScript);
        assert_eq!("cpp".parse::<Language>().unwrap(), Language::Cpp);
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = "ruby".parse::<Language>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(name) if name == "ruby"));
    }

    #[test]
    fn every_language_resolves_to_a_profile() {
        for language in [
            Language::Python,
            Language::JavaScript,
            Language::Java,
            Language::C,
            Language::Cpp,
        ] {
            assert_eq!(resolve(language).language(), language);
        }
    }
}
