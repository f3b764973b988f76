//! In-memory model of the `mimeapps.list` association database.
//!
//! Format reference:
//! https://specifications.freedesktop.org/mime-apps-spec/mime-apps-spec-latest.html
//!
//! Sections and the handler lists within them are order-preserving. Lines
//! before any recognized section header are ignored; a non-blank line without
//! a `key=value` delimiter inside a section is a fatal parse error rather
//! than being skipped, so an existing association can never be dropped
//! silently on the next save.

use crate::artifacts::scheme_mime_type;
use crate::config::MIMEAPPS_FILE;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::path::Path;
use urihook_fs::{Options, ScratchDir, atomic_write};
use urihook_proc::{Invocation, Runner};

const DEFAULT_APPLICATIONS: &str = "[Default Applications]";
const ADDED_ASSOCIATIONS: &str = "[Added Associations]";
const REMOVED_ASSOCIATIONS: &str = "[Removed Associations]";

type Section = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    DefaultApplications,
    AddedAssociations,
    RemovedAssociations,
}

fn section_for(line: &str) -> Option<SectionKind> {
    if line.eq_ignore_ascii_case(DEFAULT_APPLICATIONS) {
        Some(SectionKind::DefaultApplications)
    } else if line.eq_ignore_ascii_case(ADDED_ASSOCIATIONS) {
        Some(SectionKind::AddedAssociations)
    } else if line.eq_ignore_ascii_case(REMOVED_ASSOCIATIONS) {
        Some(SectionKind::RemovedAssociations)
    } else {
        None
    }
}

/// Ordered model of the three recognized `mimeapps.list` sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeAppsList {
    default_applications: Section,
    added_associations: Section,
    removed_associations: Section,
}

impl MimeAppsList {
    /// Load the database from `path`. A missing file yields empty sections,
    /// not an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut list = Self::default();
        let mut current: Option<SectionKind> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(kind) = section_for(line) {
                current = Some(kind);
                continue;
            }

            let Some(kind) = current else {
                // Preamble before any recognized section header.
                continue;
            };

            let Some((key, values)) = line.split_once('=') else {
                return Err(Error::MalformedEntry {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    text: line.to_string(),
                });
            };

            let key = key.trim().to_string();
            let values = values.split(';').map(str::to_string);
            list.section_mut(kind).entry(key).or_default().extend(values);
        }

        Ok(list)
    }

    fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::DefaultApplications => &mut self.default_applications,
            SectionKind::AddedAssociations => &mut self.added_associations,
            SectionKind::RemovedAssociations => &mut self.removed_associations,
        }
    }

    /// Handlers registered in Default Applications for `scheme`, in file
    /// order. Empty when the scheme is absent.
    pub fn handlers(&self, scheme: &str) -> &[String] {
        self.default_applications
            .get(&scheme_mime_type(scheme))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable handler list for `scheme` in Default Applications. An absent
    /// key is bound to an empty list so later insertions are visible to
    /// subsequent lookups on the same instance.
    pub fn handlers_mut(&mut self, scheme: &str) -> &mut Vec<String> {
        self.default_applications
            .entry(scheme_mime_type(scheme))
            .or_default()
    }

    /// Serialize in fixed section order. Only keys with a non-empty handler
    /// list are written; each emitted section is followed by a blank line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let sections = [
            (DEFAULT_APPLICATIONS, &self.default_applications),
            (ADDED_ASSOCIATIONS, &self.added_associations),
            (REMOVED_ASSOCIATIONS, &self.removed_associations),
        ];
        for (header, section) in sections {
            if section.is_empty() {
                continue;
            }
            out.push_str(header);
            out.push('\n');
            for (key, handlers) in section {
                if handlers.is_empty() {
                    continue;
                }
                out.push_str(key);
                out.push('=');
                out.push_str(&handlers.join(";"));
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// Write back atomically. The rename is the only step that touches the
    /// destination path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        atomic_write(path, self.render().as_bytes(), Options::new())?;
        Ok(())
    }

    /// Write back through an elevated move for destinations the process
    /// cannot write directly: render into a scratch file, `mv -f` it into
    /// place, then normalize permissions so the file stays world-readable.
    pub fn save_elevated(
        &self,
        path: impl AsRef<Path>,
        runner: &dyn Runner,
        temp_dir: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let scratch = ScratchDir::in_dir(temp_dir)?;
        let staged = scratch.write(MIMEAPPS_FILE, self.render().as_bytes())?;

        let destination = path.to_string_lossy().into_owned();
        runner
            .run(
                &Invocation::new("mv")
                    .arg("-f")
                    .arg(staged.to_string_lossy().into_owned())
                    .arg(&destination),
            )?
            .require_success()?;
        runner
            .run(&Invocation::new("chmod").arg("644").arg(&destination))?
            .require_success()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn parse(content: &str) -> Result<MimeAppsList> {
        MimeAppsList::parse(content, &PathBuf::from("mimeapps.list"))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let list = MimeAppsList::load(dir.path().join("absent.list")).unwrap();
        assert!(list.handlers("foo").is_empty());
    }

    #[test]
    fn test_parse_example() {
        let list = parse("[Default Applications]\nx-scheme-handler/foo=foo.desktop;bar.desktop\n")
            .unwrap();
        assert_eq!(list.handlers("foo"), ["foo.desktop", "bar.desktop"]);
    }

    #[test]
    fn test_duplicate_insert_is_not_deduplicated() {
        let mut list =
            parse("[Default Applications]\nx-scheme-handler/foo=foo.desktop;bar.desktop\n")
                .unwrap();
        list.handlers_mut("foo").insert(0, "foo.desktop".to_string());
        assert!(
            list.render()
                .contains("x-scheme-handler/foo=foo.desktop;foo.desktop;bar.desktop")
        );
    }

    #[test]
    fn test_handlers_mut_binds_absent_scheme() {
        let mut list = MimeAppsList::default();
        assert!(list.handlers("foo").is_empty());
        list.handlers_mut("foo").push("foo.desktop".to_string());
        assert_eq!(list.handlers("foo"), ["foo.desktop"]);
    }

    #[test]
    fn test_repeated_keys_merge_by_appending() {
        let list = parse(
            "[Default Applications]\n\
             x-scheme-handler/foo=a.desktop\n\
             x-scheme-handler/foo=b.desktop\n",
        )
        .unwrap();
        assert_eq!(list.handlers("foo"), ["a.desktop", "b.desktop"]);
    }

    #[test]
    fn test_preamble_is_ignored() {
        let list = parse(
            "some stray line\n\
             [Default Applications]\n\
             x-scheme-handler/foo=foo.desktop\n",
        )
        .unwrap();
        assert_eq!(list.handlers("foo"), ["foo.desktop"]);
    }

    #[test]
    fn test_malformed_line_in_section_is_fatal() {
        let err = parse("[Default Applications]\nno delimiter here\n").unwrap_err();
        match err {
            Error::MalformedEntry { line, text, .. } => {
                assert_eq!(line, 2);
                assert_eq!(text, "no delimiter here");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_section_headers_are_case_insensitive() {
        let list = parse("[default applications]\nx-scheme-handler/foo=foo.desktop\n").unwrap();
        assert_eq!(list.handlers("foo"), ["foo.desktop"]);
    }

    #[test]
    fn test_empty_value_segments_are_preserved() {
        let list = parse("[Default Applications]\nx-scheme-handler/foo=\n").unwrap();
        assert_eq!(list.handlers("foo"), [""]);
    }

    #[test]
    fn test_unrecognized_section_header_is_malformed() {
        // A header-looking line that is not one of the three recognized
        // sections is an ordinary entry and must carry a delimiter.
        let err = parse("[Default Applications]\n[Custom Section]\n").unwrap_err();
        assert!(matches!(err, Error::MalformedEntry { .. }));
    }

    #[test]
    fn test_render_skips_empty_lists_and_sections() {
        let mut list = MimeAppsList::default();
        list.handlers_mut("foo");
        // Bound but empty: nothing to write.
        assert_eq!(list.render(), "");
    }

    #[test]
    fn test_render_orders_sections_and_separates_with_blank_line() {
        let list = parse(
            "[Removed Associations]\n\
             x-scheme-handler/old=old.desktop\n\
             [Default Applications]\n\
             x-scheme-handler/foo=foo.desktop\n",
        )
        .unwrap();
        assert_eq!(
            list.render(),
            "[Default Applications]\n\
             x-scheme-handler/foo=foo.desktop\n\
             \n\
             [Removed Associations]\n\
             x-scheme-handler/old=old.desktop\n\
             \n"
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mimeapps.list");

        let original = parse(
            "[Default Applications]\n\
             x-scheme-handler/foo=foo.desktop;bar.desktop\n\
             x-scheme-handler/bar=bar.desktop\n\
             [Added Associations]\n\
             text/plain=editor.desktop\n",
        )
        .unwrap();
        original.save(&path).unwrap();

        let reloaded = MimeAppsList::load(&path).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn test_key_is_trimmed() {
        let list = parse("[Default Applications]\n  x-scheme-handler/foo =foo.desktop\n").unwrap();
        assert_eq!(list.handlers("foo"), ["foo.desktop"]);
    }
}
