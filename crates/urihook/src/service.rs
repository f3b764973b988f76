//! Per-scope registration service.
//!
//! Registration state is never stored; `check`/`check_any` re-derive it from
//! the OS on every call. Install and uninstall drive the external tools
//! strictly in sequence, because each step depends on the previous step's
//! on-disk effect: the MIME declaration must exist before the desktop entry
//! claims it, and the desktop entry must exist before it can be set as the
//! default handler.

use crate::artifacts::{desktop_entry, desktop_file_name, mime_declaration};
use crate::config::{Scope, XdgPaths};
use crate::mimeapps::MimeAppsList;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use urihook_fs::{ScratchDir, Transaction};
use urihook_proc::{DirectRunner, Invocation, Runner, SudoRunner};

/// A request to route `<scheme>://` URIs to an executable. Immutable once a
/// service is constructed from it.
#[derive(Debug, Clone)]
pub struct Registration {
    scheme: String,
    display_name: String,
    exec_path: String,
}

impl Registration {
    pub fn new(
        scheme: impl Into<String>,
        display_name: impl Into<String>,
        exec_path: impl Into<String>,
    ) -> Result<Self> {
        let scheme = scheme.into();
        if scheme.is_empty() || scheme.contains("://") {
            return Err(Error::InvalidScheme(scheme));
        }
        Ok(Self {
            scheme,
            display_name: display_name.into(),
            exec_path: exec_path.into(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn exec_path(&self) -> &str {
        &self.exec_path
    }
}

/// The operations every scheme-handler backend provides.
pub trait UriSchemeService {
    /// True iff the current default handler for the scheme is exactly this
    /// registration's desktop entry.
    fn check(&self) -> Result<bool>;

    /// True iff any handler at all is registered for the scheme.
    fn check_any(&self) -> Result<bool>;

    fn install(&self) -> Result<()>;

    fn uninstall(&self) -> Result<()>;
}

/// Linux XDG implementation, bound to one scope at construction.
pub struct XdgSchemeService {
    registration: Registration,
    scope: Scope,
    paths: XdgPaths,
    runner: Box<dyn Runner>,
}

impl XdgSchemeService {
    /// Bind the runner implied by the scope: direct invocation for
    /// CurrentUser, elevated for LocalMachine.
    pub fn new(registration: Registration, scope: Scope, paths: XdgPaths) -> Self {
        let runner: Box<dyn Runner> = match scope {
            Scope::CurrentUser => Box::new(DirectRunner::new()),
            Scope::LocalMachine => Box::new(SudoRunner::new()),
        };
        Self::with_runner(registration, scope, paths, runner)
    }

    /// Construct with an explicit runner. Tests inject recording fakes here.
    pub fn with_runner(
        registration: Registration,
        scope: Scope,
        paths: XdgPaths,
        runner: Box<dyn Runner>,
    ) -> Self {
        Self {
            registration,
            scope,
            paths,
            runner,
        }
    }

    fn desktop_name(&self) -> String {
        desktop_file_name(&self.registration.scheme)
    }

    fn query_default_handler(&self) -> Result<String> {
        let out = self.runner.run(
            &Invocation::new("xdg-settings")
                .args(["get", "default-url-scheme-handler"])
                .arg(&self.registration.scheme),
        )?;
        Ok(out.stdout_trimmed().to_string())
    }

    fn mime_invocation(&self, verb: &str, xml_path: &Path) -> Invocation {
        let mut inv = Invocation::new("xdg-mime")
            .arg(verb)
            .arg(xml_path.to_string_lossy().into_owned());
        if self.scope == Scope::LocalMachine {
            inv = inv.args(["--mode", "system"]);
        }
        inv.arg("--novendor")
    }

    fn mimeapps_path(&self) -> PathBuf {
        self.paths.mimeapps_path(self.scope)
    }

    /// Run `mutate` against a freshly loaded database and save it back
    /// through the elevated path, holding a best-effort advisory lock across
    /// the whole cycle. The system path is usually not openable by the
    /// invoking user, in which case the cycle proceeds unlocked.
    fn update_database(&self, mutate: impl FnOnce(&mut Vec<String>)) -> Result<()> {
        let db_path = self.mimeapps_path();
        let _lock = Transaction::open_locked(&db_path).ok();

        let mut db = MimeAppsList::load(&db_path)?;
        mutate(db.handlers_mut(&self.registration.scheme));
        db.save_elevated(&db_path, self.runner.as_ref(), self.paths.temp_dir())
    }
}

impl UriSchemeService for XdgSchemeService {
    fn check(&self) -> Result<bool> {
        match self.scope {
            Scope::CurrentUser => Ok(self.query_default_handler()? == self.desktop_name()),
            Scope::LocalMachine => {
                let db = MimeAppsList::load(self.mimeapps_path())?;
                Ok(db.handlers(&self.registration.scheme).first()
                    == Some(&self.desktop_name()))
            }
        }
    }

    fn check_any(&self) -> Result<bool> {
        match self.scope {
            Scope::CurrentUser => Ok(!self.query_default_handler()?.is_empty()),
            Scope::LocalMachine => {
                let db = MimeAppsList::load(self.mimeapps_path())?;
                Ok(!db.handlers(&self.registration.scheme).is_empty())
            }
        }
    }

    fn install(&self) -> Result<()> {
        let scheme = &self.registration.scheme;
        let desktop_name = self.desktop_name();

        // Deleted on every exit path, including early `?` returns.
        let scratch = ScratchDir::in_dir(self.paths.temp_dir())?;

        let xml_path = scratch.write(
            &format!("{scheme}.xml"),
            mime_declaration(scheme).as_bytes(),
        )?;
        debug!(%scheme, path = %xml_path.display(), "installing mime declaration");
        self.runner
            .run(&self.mime_invocation("install", &xml_path))?
            .require_success()?;

        let desktop_path = scratch.write(
            &desktop_name,
            desktop_entry(
                &self.registration.display_name,
                &self.registration.exec_path,
                scheme,
            )
            .as_bytes(),
        )?;
        debug!(%scheme, path = %desktop_path.display(), "installing desktop entry");
        let mut install_entry =
            Invocation::new("desktop-file-install").arg(desktop_path.to_string_lossy().into_owned());
        if self.scope == Scope::CurrentUser {
            install_entry = install_entry.arg(format!(
                "--dir={}",
                self.paths.applications_dir(Scope::CurrentUser).display()
            ));
        }
        self.runner.run(&install_entry)?.require_success()?;

        match self.scope {
            Scope::CurrentUser => {
                self.runner
                    .run(
                        &Invocation::new("xdg-settings")
                            .args(["set", "default-url-scheme-handler"])
                            .arg(scheme)
                            .arg(&desktop_name)
                            .exit_message(2, "executable path does not exist"),
                    )?
                    .require_success()?;
            }
            Scope::LocalMachine => {
                // Remove existing occurrences before the front insert so a
                // repeated install never accumulates duplicates.
                self.update_database(|handlers| {
                    handlers.retain(|h| h != &desktop_name);
                    handlers.insert(0, desktop_name.clone());
                })?;
            }
        }

        info!(%scheme, scope = ?self.scope, "uri scheme handler installed");
        Ok(())
    }

    fn uninstall(&self) -> Result<()> {
        let scheme = &self.registration.scheme;
        let desktop_name = self.desktop_name();

        let scratch = ScratchDir::in_dir(self.paths.temp_dir())?;

        // The uninstall tool matches on the declaration content, so the same
        // XML is regenerated.
        let xml_path = scratch.write(
            &format!("{scheme}.xml"),
            mime_declaration(scheme).as_bytes(),
        )?;
        debug!(%scheme, "uninstalling mime declaration");
        self.runner
            .run(&self.mime_invocation("uninstall", &xml_path))?
            .require_success()?;

        let installed = self.paths.applications_dir(self.scope).join(&desktop_name);
        match self.scope {
            Scope::CurrentUser => match std::fs::remove_file(&installed) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
            Scope::LocalMachine => {
                self.runner
                    .run(
                        &Invocation::new("rm")
                            .arg("-f")
                            .arg(installed.to_string_lossy().into_owned()),
                    )?
                    .require_success()?;
                self.update_database(|handlers| {
                    handlers.retain(|h| h != &desktop_name);
                })?;
            }
        }

        info!(%scheme, scope = ?self.scope, "uri scheme handler uninstalled");
        Ok(())
    }
}
