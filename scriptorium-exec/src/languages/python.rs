use std::path::Path;

use crate::languages::{Language, LanguageProfile, ToolCommand};

pub struct PythonProfile;

impl LanguageProfile for PythonProfile {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn run_command(&self, source_file: &Path) -> ToolCommand {
        ToolCommand::new("python3").arg(source_file.to_string_lossy())
    }
}
