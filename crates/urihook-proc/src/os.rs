//! Operating system detection and external tool probing.

use crate::{DirectRunner, Invocation, Runner};
use once_cell::sync::Lazy;
use sysinfo::System;

/// Operating system families the selector distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    Macos,
    Linux,
    Unknown,
}

static CURRENT_OS: Lazy<Os> = Lazy::new(|| match System::name().as_deref() {
    Some("Windows") => Os::Windows,
    Some("macOS") => Os::Macos,
    Some(name) if name.starts_with("Linux") => Os::Linux,
    _ => Os::Unknown,
});

/// Detect the current operating system.
pub fn detect() -> Os {
    *CURRENT_OS
}

/// Probe whether `tool` is installed and runnable, by invoking it with a
/// version flag and checking for a clean exit.
pub fn tool_available(tool: &str) -> bool {
    let inv = Invocation::new(tool).arg("--version");
    match DirectRunner::new().run(&inv) {
        Ok(out) => out.success(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_stable() {
        assert_eq!(detect(), detect());
    }

    #[test]
    fn test_tool_available_for_missing_tool() {
        assert!(!tool_available("definitely-not-a-real-tool-12345"));
    }

    #[test]
    fn test_tool_available_returns_bool() {
        let result = tool_available("cargo");
        assert!(result || !result);
    }
}
