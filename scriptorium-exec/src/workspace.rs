use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::Error;
use crate::languages::LanguageProfile;

/// Request-scoped scratch directory holding one submission's source file
/// and, transiently, its compiled artifact.
///
/// Every request gets its own uniquely named directory; nothing is ever
/// shared or reused across requests. Removal happens in `Drop`, so every
/// exit path (success, compile error, timeout, panic) reclaims it.
pub struct Workspace {
    root_dir: PathBuf,
    source_file: PathBuf,
    artifact: Option<PathBuf>,
}

impl Workspace {
    /// Stage a submission: allocate a unique directory under the process
    /// temp dir and write the source into it. The profile validates the
    /// file name first, so invalid source never touches the filesystem.
    pub async fn create(profile: &dyn LanguageProfile, code: &str) -> Result<Self, Error> {
        let file_name = profile.source_file_name(code)?;

        let root_dir = std::env::temp_dir().join(format!("scriptorium-{}", Uuid::new_v4()));
        fs::create_dir_all(&root_dir).await?;
        fs::write(root_dir.join(&file_name), code).await?;

        debug!(
            workspace = %root_dir.display(),
            file = %file_name,
            "staged submission"
        );

        Ok(Self {
            root_dir,
            source_file: PathBuf::from(file_name),
            artifact: None,
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Source file name, relative to the workspace root
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Record the artifact the compile stage produced
    pub fn set_artifact(&mut self, name: impl Into<PathBuf>) {
        self.artifact = Some(name.into());
    }

    /// Compiled artifact name, relative to the workspace root
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        // Removing an already-gone directory is fine; anything else is
        // logged but never masks the pipeline outcome.
        match std::fs::remove_dir_all(&self.root_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => error!(
                workspace = %self.root_dir.display(),
                "failed to clean up workspace: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::resolve;
    use crate::Language;

    #[tokio::test]
    async fn stages_source_verbatim() -> Result<(), Error> {
        let profile = resolve(Language::Python);
        let code = "print('staged')\n";

        let workspace = Workspace::create(profile.as_ref(), code).await?;
        let staged = workspace.root_dir().join(workspace.source_file());
        assert_eq!(std::fs::read_to_string(&staged)?, code);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_workspaces_never_collide() -> Result<(), Error> {
        let profile = resolve(Language::Python);
        let a = Workspace::create(profile.as_ref(), "print(1)").await?;
        let b = Workspace::create(profile.as_ref(), "print(2)").await?;
        assert_ne!(a.root_dir(), b.root_dir());
        Ok(())
    }

    #[tokio::test]
    async fn drop_removes_the_directory() -> Result<(), Error> {
        let profile = resolve(Language::Python);
        let workspace = Workspace::create(profile.as_ref(), "print('gone')").await?;
        let root = workspace.root_dir().to_path_buf();
        assert!(root.exists());

        drop(workspace);
        assert!(!root.exists());
        Ok(())
    }

    #[tokio::test]
    async fn drop_tolerates_an_already_removed_directory() -> Result<(), Error> {
        let profile = resolve(Language::Python);
        let workspace = Workspace::create(profile.as_ref(), "print('early')").await?;
        std::fs::remove_dir_all(workspace.root_dir())?;
        drop(workspace);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_java_source_never_touches_the_filesystem() {
        let profile = resolve(Language::Java);
        let result = Workspace::create(profile.as_ref(), "class NoPublic {}").await;
        assert!(matches!(result, Err(Error::InvalidSource(_))));
    }
}
