//! Small shared helpers.

/// Format a byte count as a human-readable megabyte string, e.g. `12.34 MB`.
pub fn human_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0.00 MB");
        assert_eq!(human_size(1024 * 1024), "1.00 MB");
        assert_eq!(human_size(52_428_800), "50.00 MB");
        assert_eq!(human_size(1_500_000), "1.43 MB");
    }
}
