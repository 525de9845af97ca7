//! Path and size helpers shared by the dispatcher, the handle and the CLI.

const FILE_SCHEME: &str = "file://";

/// Remove leading `file://` schemes so platform APIs get a bare filesystem path.
///
/// Repeated prefixes are all removed, so stripping twice equals stripping once.
pub fn strip_file_scheme(mut path: &str) -> &str {
    while let Some(rest) = path.strip_prefix(FILE_SCHEME) {
        path = rest;
    }
    path
}

/// Replace a trailing `.ext` with `.webp`, or append it when there is none.
pub fn webp_output_path(input_path: &str) -> String {
    let name_start = input_path.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let name = &input_path[name_start..];

    match name.rfind('.') {
        Some(dot)
            if dot + 1 < name.len()
                && name[dot + 1..]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            format!("{}.webp", &input_path[..name_start + dot])
        }
        _ => format!("{}.webp", input_path),
    }
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Last path segment, or `None` when the path ends in a separator.
pub fn extract_file_name(path: &str) -> Option<&str> {
    path.rsplit(['/', '\\']).next().filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_file_scheme() {
        assert_eq!(strip_file_scheme("file:///tmp/a.png"), "/tmp/a.png");
        assert_eq!(strip_file_scheme("/tmp/a.png"), "/tmp/a.png");
        assert_eq!(strip_file_scheme("relative/a.png"), "relative/a.png");
    }

    #[test]
    fn test_strip_file_scheme_is_idempotent() {
        for path in ["file:///tmp/a.png", "file://file:///tmp/a.png", "/tmp/a.png"] {
            let once = strip_file_scheme(path);
            assert_eq!(once, "/tmp/a.png");
            assert_eq!(strip_file_scheme(once), once);
        }
    }

    #[test]
    fn test_webp_output_path() {
        assert_eq!(webp_output_path("/tmp/photo.png"), "/tmp/photo.webp");
        assert_eq!(webp_output_path("file:///tmp/photo.jpeg"), "file:///tmp/photo.webp");
        assert_eq!(webp_output_path("/tmp/archive.tar.gz"), "/tmp/archive.tar.webp");
        assert_eq!(webp_output_path("/tmp/noext"), "/tmp/noext.webp");
        assert_eq!(webp_output_path("/tmp.d/noext"), "/tmp.d/noext.webp");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
    }

    #[test]
    fn test_extract_file_name() {
        assert_eq!(extract_file_name("/tmp/photo.png"), Some("photo.png"));
        assert_eq!(extract_file_name("C:\\images\\icon.webp"), Some("icon.webp"));
        assert_eq!(extract_file_name("photo.png"), Some("photo.png"));
        assert_eq!(extract_file_name("/tmp/"), None);
    }
}
