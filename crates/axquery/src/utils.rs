use sysinfo::{Pid, ProcessesToUpdate, System};

/// Normalize a string by removing zero-width and special Unicode whitespace characters and lowercasing it.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| {
            // Remove zero-width and non-breaking spaces, but keep regular spaces
            !matches!(
                *c,
                '\u{200B}' | // zero-width space
                '\u{200C}' | // zero-width non-joiner
                '\u{200D}' | // zero-width joiner
                '\u{00A0}' | // non-breaking space
                '\u{FEFF}' // zero-width no-break space
            )
        })
        .collect::<String>()
        .to_lowercase()
}

/// Case-insensitive substring test on normalized text.
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    normalize(haystack).contains(&normalize(needle))
}

/// Cut a string to at most `max` characters, appending an ellipsis when cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}

/// Find the PID of a running process by name (case-insensitive substring match)
/// or by executable path (exact match).
pub fn find_pid_for_process(name_or_path: &str) -> Option<i32> {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let wanted = name_or_path.to_lowercase();
    let looks_like_path = name_or_path.contains('/');

    system
        .processes()
        .iter()
        .find(|(_, process)| {
            if looks_like_path {
                process
                    .exe()
                    .map(|exe| exe.to_string_lossy().starts_with(name_or_path))
                    .unwrap_or(false)
            } else {
                process
                    .name()
                    .to_string_lossy()
                    .to_lowercase()
                    .contains(&wanted)
            }
        })
        .map(|(pid, _)| pid.as_u32() as i32)
}

/// Name of the process with the given PID, used for diagnostic hints only.
pub fn process_name_for_pid(pid: i32) -> Option<String> {
    if pid <= 0 {
        return None;
    }
    let mut system = System::new();
    let target = Pid::from_u32(pid as u32);
    system.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
    system
        .process(target)
        .map(|p| p.name().to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_invisible_characters() {
        assert_eq!(normalize("Save\u{200B} As"), "save as");
        assert_eq!(normalize("Open\u{00A0}File"), "openfile");
    }

    #[test]
    fn test_contains_normalized() {
        assert!(contains_normalized("Save As…", "save"));
        assert!(!contains_normalized("Cancel", "save"));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("保存ファイル", 2), "保存…");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_current_process_name_is_found() {
        let pid = std::process::id() as i32;
        assert!(process_name_for_pid(pid).is_some());
        assert_eq!(process_name_for_pid(-1), None);
    }
}
