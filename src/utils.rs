/// Returns `true` when the final segment of a remote path carries a non-empty
/// extension, e.g. `/srv/app.tar.gz` or `/home/u/.profile`.
pub fn has_extension(remote: &str) -> bool {
    let name = remote.rsplit('/').next().unwrap_or(remote);
    name.rsplit_once('.')
        .is_some_and(|(_, extension)| !extension.is_empty())
}

/// Parent directory of a remote path: `/` for a top-level entry and `.` for
/// a bare file name.
pub fn remote_parent(remote: &str) -> &str {
    match remote.rfind('/') {
        Some(idx) => match remote[..idx].trim_end_matches('/') {
            "" => "/",
            parent => parent,
        },
        None => ".",
    }
}

/// Masks authentication method names in SSH error text and caps its length
/// before it reaches the logs.
pub fn sanitize_ssh_error(error: &impl std::fmt::Display) -> String {
    let mut msg = error.to_string();
    for method in &["publickey", "keyboard-interactive", "gssapi-with-mic"] {
        msg = msg.replace(method, "***");
    }
    if msg.len() > 500 {
        let mut cut = 500;
        while !msg.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... (truncated)", &msg[..cut])
    } else {
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_detection() {
        assert!(has_extension("/r/a.txt"));
        assert!(has_extension("archive.tar.gz"));
        assert!(has_extension("/home/deploy/.profile"));
        assert!(!has_extension("/remote/dir"));
        assert!(!has_extension("/remote/file."));
        assert!(!has_extension("/remote.d/file"));
        assert!(!has_extension(""));
    }

    #[test]
    fn parent_directory() {
        assert_eq!(remote_parent("/r/a.txt"), "/r");
        assert_eq!(remote_parent("/srv/www/site/index.html"), "/srv/www/site");
        assert_eq!(remote_parent("/a.txt"), "/");
        assert_eq!(remote_parent("a.txt"), ".");
        assert_eq!(remote_parent("docs/a.txt"), "docs");
        assert_eq!(remote_parent("/r//a.txt"), "/r");
    }

    #[test]
    fn sanitize_masks_methods() {
        let msg = sanitize_ssh_error(&"server allows: publickey,password");
        assert_eq!(msg, "server allows: ***,password");

        let long = "x".repeat(800);
        let msg = sanitize_ssh_error(&long);
        assert!(msg.ends_with("... (truncated)"));
        assert!(msg.len() < 600);
    }
}
