use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct UploadsConfig {
    /// Root directory for stored files; served under `/uploads`.
    pub base_dir: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl UploadsConfig {
    pub fn from_env() -> Self {
        Self {
            base_dir: env::var("ETEEAP_UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_upload_bytes: env::var("ETEEAP_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50 * 1024 * 1024), // 50MB
        }
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.base_dir.join("profile")
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.base_dir.join("documents")
    }
}
