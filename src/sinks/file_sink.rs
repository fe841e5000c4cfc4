use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{error, info};

use crate::cache::TokenIssuer;
use crate::config::settings::FileSinkConfig;
use crate::helpers::jwt::log_token;

/// Propagates the current bearer token into a file, atomically.
#[derive(Debug, Clone)]
pub struct FileSink {
    pub path: PathBuf,
    last_written: Option<String>,
}

impl FileSink {
    pub fn new(cfg: &FileSinkConfig) -> Self {
        Self {
            path: PathBuf::from(&cfg.path),
            last_written: None,
        }
    }

    /// Write `token` unless it is the one already on disk.
    /// Returns whether the file was rewritten.
    pub async fn propagate(&mut self, token: &str) -> Result<bool> {
        // skip storing if the same token is already written
        if self.last_written.as_deref() == Some(token) {
            return Ok(false);
        }
        write_atomic(&self.path, token.as_bytes()).await?;
        info!("sink file: token written, path '{}'", self.path.display());
        self.last_written = Some(token.to_owned());
        Ok(true)
    }

    /// One refresh round: get the current token from `issuer` and write it.
    ///
    /// Errors are logged and swallowed so the caller's loop keeps going; the
    /// issuer retries on the next call. Returns whether the file was rewritten.
    pub async fn refresh(&mut self, issuer: &TokenIssuer, print_claims: bool) -> bool {
        let token = match issuer.bearer_token() {
            Ok(token) => token,
            Err(e) => {
                error!(kind = %e.kind(), "failed to issue bearer token: {}", e);
                return false;
            }
        };
        match self.propagate(&token).await {
            Ok(written) => {
                if written && print_claims {
                    if let Err(e) = log_token(&token) {
                        error!("failed to decode issued token: {:#}", e);
                    }
                }
                written
            }
            Err(e) => {
                error!("sink file: {:#}", e);
                false
            }
        }
    }

    /// Delete the token file; a missing file is not an error.
    pub async fn remove(&mut self) -> Result<()> {
        self.last_written = None;
        match fs::remove_file(&self.path).await {
            Ok(_) => {
                info!("Deleted file: {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("File not found, nothing to delete: {}", self.path.display());
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("failed to delete {}", self.path.display())),
        }
    }
}

/// tmp file -> 0600 -> rename over `path`
async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, content)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
    }
    fs::rename(&tmp, path)
        .await
        .with_context(|| format!("failed to move token into {}", path.display()))?;
    Ok(())
}
