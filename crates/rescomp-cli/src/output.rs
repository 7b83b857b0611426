//! Warning and report formatting.

use rescomp_core::Warning;

/// Formats warnings as pretty-printed JSON.
pub fn format_json(warnings: &[Warning]) -> String {
    serde_json::to_string_pretty(warnings).unwrap_or_else(|_| "[]".to_string())
}

/// Prints the warning table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<10} {:<28} {:<20} {}", "SEVERITY", "CODE", "ENTITY", "MESSAGE");
    println!("{}", "-".repeat(100));
}

/// Formats one warning as a table row.
pub fn format_table_row(warning: &Warning) -> String {
    format!(
        "{:<10} {:<28} {:<20} {}",
        format!("{:?}", warning.severity),
        format!("{:?}", warning.code),
        truncate(warning.entity.as_deref().unwrap_or("-"), 20),
        warning.message
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let budget = max_len.saturating_sub(3);
    let mut end = 0;
    for (idx, ch) in s.char_indices() {
        if idx + ch.len_utf8() > budget {
            break;
        }
        end = idx + ch.len_utf8();
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 20), "short");
    }

    #[test]
    fn truncate_cuts_long_strings() {
        assert_eq!(truncate("abcdefghijklmnopqrstuv", 20), "abcdefghijklmnopq...");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        // 16 ASCII bytes followed by two-byte characters; the cut must not
        // land inside one of them.
        assert_eq!(truncate("aaaaaaaaaaaaaaaa\u{fc}\u{fc}\u{fc}\u{fc}", 20), "aaaaaaaaaaaaaaaa...");
        assert_eq!(truncate("\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}", 20), "\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}\u{fc}...");
    }
}
