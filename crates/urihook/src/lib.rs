//! urihook: register custom URI scheme handlers with the XDG desktop shell.
//!
//! Registering `myapp://` routes such URIs to a chosen executable by
//! installing a MIME-type declaration, a desktop-entry launcher, and a
//! default-handler association, in that order. Two mutually exclusive scopes
//! exist: [`Scope::CurrentUser`] commits through `xdg-settings`, while
//! [`Scope::LocalMachine`] rewrites the system `mimeapps.list` through an
//! elevated runner. Both are idempotent and clean up their scratch workspace
//! on every exit path.
//!
//! ```rust,no_run
//! use urihook::{Registration, Scope, resolve};
//!
//! let registration = Registration::new("myapp", "My App", "/usr/bin/myapp")?;
//! let service = resolve(registration, Scope::CurrentUser)?;
//! if !service.check()? {
//!     service.install()?;
//! }
//! # Ok::<(), urihook::Error>(())
//! ```

pub mod artifacts;
pub mod config;
mod error;
pub mod mimeapps;
pub mod selector;
pub mod service;

pub use config::{Scope, XdgPaths};
pub use error::{Error, Result};
pub use mimeapps::MimeAppsList;
pub use selector::resolve;
pub use service::{Registration, UriSchemeService, XdgSchemeService};
