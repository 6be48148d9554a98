/// Name used when the run response does not suggest one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "newsletter.docx";

const MAX_NAME_CHARS: usize = 120;
/// Longer suffixes are not treated as an extension worth keeping.
const MAX_EXTENSION_CHARS: usize = 16;

/// Suggested download name from a `Content-Disposition` value such as
/// `attachment; filename="report.docx"`, or [`DEFAULT_DOWNLOAD_NAME`].
pub fn filename_from_disposition(header: Option<&str>) -> String {
    header
        .and_then(quoted_filename)
        .unwrap_or(DEFAULT_DOWNLOAD_NAME)
        .to_string()
}

/// Everything between `filename="` and the last `"` of the header.
fn quoted_filename(header: &str) -> Option<&str> {
    const MARKER: &str = "filename=\"";
    let start = header.find(MARKER)? + MARKER.len();
    let rest = &header[start..];
    let end = rest.rfind('"')?;
    let name = &rest[..end];
    (!name.is_empty()).then_some(name)
}

/// Reduces a server-suggested name to a single safe path component.
pub fn sanitize_download_name(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }

    let mut name = truncate_keeping_extension(&compacted, MAX_NAME_CHARS);
    if name.is_empty() {
        return DEFAULT_DOWNLOAD_NAME.to_string();
    }
    let stem = name.split('.').next().unwrap_or_default();
    if is_reserved_windows_name(stem) {
        name.insert(0, '_');
    }
    name
}

/// Cuts the stem so `report.docx` stays openable as a `.docx` after truncation.
fn truncate_keeping_extension(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.chars().count() <= MAX_EXTENSION_CHARS => {
            let keep = max_chars - ext.chars().count() - 1;
            let stem: String = stem.chars().take(keep).collect();
            format!("{stem}.{ext}")
        }
        _ => name.chars().take(max_chars).collect(),
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
