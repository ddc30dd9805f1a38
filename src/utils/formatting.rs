//! Text formatting utilities for the tree card viewer.

use sysinfo::{System, RefreshKind, ProcessRefreshKind, Pid};
use treecard::ExpansionPolicy;

/// Formats a count with thousands separators.
///
/// # Examples
/// ```ignore
/// assert_eq!(format_count(1000), "1,000");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}

/// Human-readable name of an expansion policy for menus.
pub fn describe_policy(policy: ExpansionPolicy) -> String {
    match policy {
        ExpansionPolicy::Collapsed => "Collapsed".to_string(),
        ExpansionPolicy::Expanded => "Expanded".to_string(),
        ExpansionPolicy::MaxDepth(depth) => format!("Depth < {}", depth),
        ExpansionPolicy::LabelLength(len) => format!("Label length {}", len),
    }
}

/// Gets the current process memory usage in megabytes.
///
/// Returns 0.0 if the process information cannot be retrieved.
pub fn get_current_memory_mb() -> f64 {
    let mut sys = System::new_with_specifics(
        RefreshKind::new().with_processes(ProcessRefreshKind::new().with_memory())
    );
    sys.refresh_processes_specifics(ProcessRefreshKind::new().with_memory());

    if let Some(process) = sys.process(Pid::from_u32(std::process::id())) {
        process.memory() as f64 / (1024.0 * 1024.0)
    } else {
        0.0
    }
}

/// Formats memory usage in MB as a human-readable string.
pub fn format_memory_mb(memory_mb: f64) -> String {
    if memory_mb > 1024.0 {
        format!("Memory: {:.2} GB", memory_mb / 1024.0)
    } else {
        format!("Memory: {:.1} MB", memory_mb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_memory() {
        assert_eq!(format_memory_mb(512.5), "Memory: 512.5 MB");
        assert_eq!(format_memory_mb(2048.0), "Memory: 2.00 GB");
    }

    #[test]
    fn test_describe_policy() {
        assert_eq!(describe_policy(ExpansionPolicy::default()), "Label length 7");
        assert_eq!(describe_policy(ExpansionPolicy::MaxDepth(2)), "Depth < 2");
    }
}
