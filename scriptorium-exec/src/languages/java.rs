use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::Error;
use crate::languages::{source_stem, Language, LanguageProfile, StdinMode, ToolCommand};

pub struct JavaProfile;

impl JavaProfile {
    /// The toolchain requires the file name to match the declared public
    /// class, so the class name is extracted from the source text.
    pub fn public_class_name(code: &str) -> Result<String, Error> {
        static PUBLIC_CLASS: OnceLock<Regex> = OnceLock::new();
        let re = PUBLIC_CLASS
            .get_or_init(|| Regex::new(r"public\s+class\s+(\w+)").expect("valid pattern"));

        re.captures(code)
            .map(|captures| captures[1].to_string())
            .ok_or_else(|| Error::InvalidSource("No public class found".to_string()))
    }
}

impl LanguageProfile for JavaProfile {
    fn language(&self) -> Language {
        Language::Java
    }

    fn extension(&self) -> &'static str {
        "java"
    }

    fn source_file_name(&self, code: &str) -> Result<String, Error> {
        let class_name = Self::public_class_name(code)?;
        Ok(format!("{}.{}", class_name, self.extension()))
    }

    fn compile_command(&self, source_file: &Path) -> Option<ToolCommand> {
        Some(ToolCommand::new("javac").arg(source_file.to_string_lossy()))
    }

    fn artifact_name(&self, source_file: &Path) -> Option<String> {
        Some(format!("{}.class", source_stem(source_file)))
    }

    fn run_command(&self, source_file: &Path) -> ToolCommand {
        ToolCommand::new("java").arg(source_stem(source_file))
    }

    fn stdin_mode(&self) -> StdinMode {
        StdinMode::Argv
    }
}
