//! Generated registration artifacts: the shared-mime-info declaration and
//! the desktop-entry launcher. Both are written only into a scratch
//! workspace and handed to the external install tools.

const MIME_INFO_NS: &str = "http://www.freedesktop.org/standards/shared-mime-info";

pub fn scheme_mime_type(scheme: &str) -> String {
    format!("x-scheme-handler/{scheme}")
}

pub fn desktop_file_name(scheme: &str) -> String {
    format!("{scheme}.desktop")
}

/// XML document declaring `x-scheme-handler/<scheme>` with the shared MIME
/// database.
pub fn mime_declaration(scheme: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <mime-info xmlns=\"{MIME_INFO_NS}\">\n\
         \t<mime-type type=\"{}\"/>\n\
         </mime-info>\n",
        scheme_mime_type(scheme)
    )
}

/// Desktop-entry launcher text, fields in the order the desktop shell
/// expects. `%u` receives the opened URI.
pub fn desktop_entry(display_name: &str, exec_path: &str, scheme: &str) -> String {
    format!(
        "[Desktop Entry]\n\
         Name={display_name}\n\
         Exec={exec_path} %u\n\
         Type=Application\n\
         NoDisplay=true\n\
         Categories=Utility\n\
         MimeType={}\n",
        scheme_mime_type(scheme)
    )
}
