use std::path::Path;

use crate::languages::{Language, LanguageProfile, StdinMode, ToolCommand};

pub struct JavaScriptProfile;

impl LanguageProfile for JavaScriptProfile {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn extension(&self) -> &'static str {
        "js"
    }

    fn run_command(&self, source_file: &Path) -> ToolCommand {
        ToolCommand::new("node").arg(source_file.to_string_lossy())
    }

    // Input tokens ride the command line, not the stdin pipe
    fn stdin_mode(&self) -> StdinMode {
        StdinMode::Argv
    }
}
