use std::path::Path;

use crate::languages::{source_stem, Language, LanguageProfile, ToolCommand};

pub struct CppProfile;

impl LanguageProfile for CppProfile {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn extension(&self) -> &'static str {
        "cpp"
    }

    fn compile_command(&self, source_file: &Path) -> Option<ToolCommand> {
        Some(
            ToolCommand::new("g++")
                .arg(source_file.to_string_lossy())
                .arg("-o")
                .arg(source_stem(source_file)),
        )
    }

    fn artifact_name(&self, source_file: &Path) -> Option<String> {
        Some(source_stem(source_file))
    }

    fn run_command(&self, source_file: &Path) -> ToolCommand {
        ToolCommand::new(format!("./{}", source_stem(source_file)))
    }
}
