//! Injected path configuration.
//!
//! All environment and home-directory lookups happen once here, so the
//! registration service never reads global process state and tests can
//! point every path at a scratch directory.

use crate::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

pub(crate) const MIMEAPPS_FILE: &str = "mimeapps.list";

const DEFAULT_SYSTEM_CONFIG_DIR: &str = "/etc/xdg";
const DEFAULT_SYSTEM_APPLICATIONS_DIR: &str = "/usr/share/applications";

/// Registration scope. Carries no paths itself; [`XdgPaths`] resolves the
/// concrete locations once and the service binds runner and paths from the
/// pair at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Writes to the user's local directories, no elevation.
    CurrentUser,
    /// Writes to system-wide directories, requires elevation.
    LocalMachine,
}

/// Resolved filesystem locations for both scopes.
#[derive(Debug, Clone)]
pub struct XdgPaths {
    /// Directory holding the per-user `mimeapps.list`.
    pub config_home: PathBuf,
    /// First segment of `XDG_CONFIG_DIRS`; holds the system `mimeapps.list`.
    pub system_config_dir: PathBuf,
    /// Per-user desktop-entry directory.
    pub user_applications_dir: PathBuf,
    /// System-wide desktop-entry directory.
    pub system_applications_dir: PathBuf,
    /// Root for scratch workspaces.
    pub temp_dir: PathBuf,
}

impl XdgPaths {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        let home = home::home_dir().ok_or(Error::NoHomeDir)?;

        // The per-user database falls back to the home directory itself when
        // XDG_CONFIG_HOME is unset.
        let config_home = env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| home.clone());

        // Only the first segment of XDG_CONFIG_DIRS is consulted.
        let system_config_dir = env::var("XDG_CONFIG_DIRS")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|dirs| PathBuf::from(dirs.split(':').next().unwrap_or(&dirs)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSTEM_CONFIG_DIR));

        let system_applications_dir = env::var_os("DESKTOP_FILE_INSTALL_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSTEM_APPLICATIONS_DIR));

        Ok(Self {
            config_home,
            system_config_dir,
            user_applications_dir: home.join(".local").join("share").join("applications"),
            system_applications_dir,
            temp_dir: env::temp_dir(),
        })
    }

    pub fn mimeapps_path(&self, scope: Scope) -> PathBuf {
        match scope {
            Scope::CurrentUser => self.config_home.join(MIMEAPPS_FILE),
            Scope::LocalMachine => self.system_config_dir.join(MIMEAPPS_FILE),
        }
    }

    pub fn applications_dir(&self, scope: Scope) -> &Path {
        match scope {
            Scope::CurrentUser => &self.user_applications_dir,
            Scope::LocalMachine => &self.system_applications_dir,
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }
}
