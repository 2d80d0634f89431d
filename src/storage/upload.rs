use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use crate::core::library::LibraryResult;

/// A file received with a request and parked on local disk until a flow pushes it to the bucket.
///
/// The flow that receives it owns it; the temporary file is removed when the value is dropped,
/// whichever way the flow ends. A failed removal is only logged.
#[derive(Debug)]
pub(crate) struct StagedUpload {
    file: Option<NamedTempFile>,
    original_name: String,
    content_type: String,
}

impl StagedUpload {
    pub async fn stage(dir: &Path, original_name: &str, content_type: &str, bytes: &[u8]) -> LibraryResult<Self> {
        let file = NamedTempFile::new_in(dir)?;
        tokio::fs::write(file.path(), bytes).await?;
        Ok(Self {
            file: Some(file),
            original_name: original_name.to_string(),
            content_type: content_type.to_string(),
        })
    }

    pub fn original_name(&self) -> &str {
        self.original_name.as_str()
    }

    pub fn content_type(&self) -> &str {
        self.content_type.as_str()
    }

    #[cfg(test)]
    pub fn path(&self) -> Option<std::path::PathBuf> {
        self.file.as_ref().map(|f| f.path().to_path_buf())
    }

    pub async fn read(&self) -> LibraryResult<Vec<u8>> {
        match self.file {
            Some(ref file) => Ok(tokio::fs::read(file.path()).await?),
            None => Ok(vec![]),
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            match file.close() {
                Ok(_) => debug!(path = %path.display(), "released staged upload"),
                Err(err) => warn!(path = %path.display(), error = %err, "failed to release staged upload"),
            }
        }
    }
}
