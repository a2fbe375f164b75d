use bat::PrettyPrinter;

/// Render an assistant reply as markdown in the terminal.
pub async fn markdown(content: &str) {
    PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print()
        .unwrap();
}

/// Human-readable "N minutes/hours/days ago" for a unix-seconds timestamp.
pub fn relative_time(timestamp: i64) -> String {
    relative_from(chrono::Utc::now().timestamp(), timestamp)
}

fn relative_from(now: i64, timestamp: i64) -> String {
    let diff = (now - timestamp).max(0);
    let minutes = diff / 60;
    let hours = diff / 3600;
    let days = diff / 86400;

    if minutes < 60 {
        format!("{} minute{} ago", minutes, if minutes != 1 { "s" } else { "" })
    } else if hours < 24 {
        format!("{} hour{} ago", hours, if hours != 1 { "s" } else { "" })
    } else {
        format!("{} day{} ago", days, if days != 1 { "s" } else { "" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_from() {
        let now = 1_000_000;
        assert_eq!(relative_from(now, now - 60), "1 minute ago");
        assert_eq!(relative_from(now, now - 120), "2 minutes ago");
        assert_eq!(relative_from(now, now - 3_600), "1 hour ago");
        assert_eq!(relative_from(now, now - 7_200), "2 hours ago");
        assert_eq!(relative_from(now, now - 86_400), "1 day ago");
        assert_eq!(relative_from(now, now - 259_200), "3 days ago");
    }

    #[test]
    fn test_relative_from_clamps_future_timestamps() {
        assert_eq!(relative_from(1_000, 2_000), "0 minutes ago");
    }
}
