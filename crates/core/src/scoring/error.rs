use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ModelArtifactError {
    pub path: PathBuf,
    pub stage: &'static str,
    pub detail: String,
}

impl fmt::Display for ModelArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "model artifact error (path={}, stage={}): {}",
            self.path.display(),
            self.stage,
            self.detail
        )
    }
}

impl std::error::Error for ModelArtifactError {}
