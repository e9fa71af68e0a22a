use std::path::Path;

use crate::languages::{source_stem, Language, LanguageProfile, ToolCommand};

pub struct CProfile;

impl LanguageProfile for CProfile {
    fn language(&self) -> Language {
        Language::C
    }

    fn extension(&self) -> &'static str {
        "c"
    }

    fn compile_command(&self, source_file: &Path) -> Option<ToolCommand> {
        Some(
            ToolCommand::new("gcc")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_and_run_commands() {
        let profile = CProfile;
        let source = Path::new("code.c");

        let compile = profile.compile_command(source).unwrap();
        assert_eq!(compile.program, "gcc");
        assert_eq!(compile.args, vec!["code.c", "-o", "code"]);

        let run = profile.run_command(source);
        assert_eq!(run.program, "./code");
        assert!(run.args.is_empty());
    }
}
