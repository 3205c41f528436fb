use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Which Chrome profile a session signs in with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileChoice {
    /// Fresh profile deleted when the session ends
    Temporary,
    /// Named profile under `~/.vocart/profiles`, keeps cookies between runs
    Named(String),
}

/// Owns the profile directory for the lifetime of the browser
pub struct ProfileManager {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileManager {
    pub fn open(choice: &ProfileChoice) -> Result<Self> {
        match choice {
            ProfileChoice::Temporary => Self::temporary(),
            ProfileChoice::Named(name) => {
                let path = dirs::home_dir()
                    .ok_or_else(|| {
                        Error::Browser("Could not determine home directory".to_string())
                    })?
                    .join(".vocart")
                    .join("profiles")
                    .join(name);
                Self::persistent(path)
            }
        }
    }

    /// Create a profile that is removed on drop
    pub fn temporary() -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("vocart-profile-")
            .tempdir()?
            .keep();

        Ok(Self {
            path,
            is_temporary: true,
        })
    }

    /// Use (and create if needed) a profile directory that outlives the session
    pub fn persistent(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
