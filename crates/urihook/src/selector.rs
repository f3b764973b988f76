//! Platform and tool selection.
//!
//! Inspects the running OS and probes for the required external tools, then
//! constructs the registration service bound to the requested scope. The
//! decision table itself is pure so it can be exercised without touching the
//! host.

use crate::config::{Scope, XdgPaths};
use crate::service::{Registration, UriSchemeService, XdgSchemeService};
use crate::{Error, Result};
use urihook_proc::os::{self, Os};

const SETTINGS_TOOL: &str = "xdg-settings";

/// Construct the registration service for the current platform.
pub fn resolve(registration: Registration, scope: Scope) -> Result<Box<dyn UriSchemeService>> {
    let current = os::detect();
    let tool_found = current == Os::Linux && os::tool_available(SETTINGS_TOOL);
    let paths = match current {
        Os::Linux if tool_found => Some(XdgPaths::from_env()?),
        _ => None,
    };
    resolve_for(current, tool_found, paths, registration, scope)
}

fn resolve_for(
    current: Os,
    tool_found: bool,
    paths: Option<XdgPaths>,
    registration: Registration,
    scope: Scope,
) -> Result<Box<dyn UriSchemeService>> {
    match current {
        Os::Linux if tool_found => {
            let paths = paths.map(Ok).unwrap_or_else(XdgPaths::from_env)?;
            Ok(Box::new(XdgSchemeService::new(registration, scope, paths)))
        }
        Os::Linux => Err(Error::UnsupportedPlatform(format!(
            "{SETTINGS_TOOL} is not available"
        ))),
        Os::Windows => Err(Error::UnsupportedPlatform(
            "the Windows registry backend is not provided by this crate".to_string(),
        )),
        _ => Err(Error::UnsupportedPlatform(
            "URI scheme handlers are not supported on this platform".to_string(),
        )),
    }
}
