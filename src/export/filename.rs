use chrono::Local;
use sanitize_filename::{is_sanitized_with_options, OptionsForCheck};

/// A base name is safe when it is non-empty and already clean under the
/// Windows rules: no `<>:"/\|?*`, no control characters, no reserved device
/// names such as `CON` or `LPT1.txt`.
pub fn is_safe_filename(name: &str) -> bool {
    !name.trim().is_empty()
        && is_sanitized_with_options(
            name,
            OptionsForCheck {
                windows: true,
                truncate: true,
            },
        )
}

pub fn generated_filename() -> String {
    format!("export_{}", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Final attachment name: the requested base (or a generated one) plus `extension`.
pub fn attachment_name(requested: Option<&str>, extension: &str) -> String {
    let base = match requested {
        Some(name) if is_safe_filename(name) => name.to_string(),
        Some(name) => {
            log::warn!("Rejected unsafe filename {:?}, using a generated one", name);
            generated_filename()
        }
        None => generated_filename(),
    };
    format!("{}{}", base, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_are_safe() {
        assert!(is_safe_filename("report"));
        assert!(is_safe_filename("lora_report_12"));
        assert!(is_safe_filename("Monthly report 2024-03"));
    }

    #[test]
    fn test_unsafe_names_are_rejected() {
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("   "));
        for name in ["../etc/passwd", "a/b", "a\\b", "a:b", "what?", "star*", "<x>", "pipe|"] {
            assert!(!is_safe_filename(name), "{} should be rejected", name);
        }
        assert!(!is_safe_filename("tab\there"));
    }

    #[test]
    fn test_reserved_device_names_are_rejected() {
        for name in ["CON", "prn", "Aux", "NUL", "COM1", "lpt9", "con.txt"] {
            assert!(!is_safe_filename(name), "{} should be rejected", name);
        }
    }

    #[test]
    fn test_attachment_name_falls_back() {
        assert_eq!(attachment_name(Some("report"), ".pdf"), "report.pdf");

        let generated = attachment_name(Some("../secret"), ".xlsx");
        assert!(generated.starts_with("export_"));
        assert!(generated.ends_with(".xlsx"));

        let generated = attachment_name(None, ".docx");
        assert!(generated.starts_with("export_"));
        assert!(generated.ends_with(".docx"));
    }
}
