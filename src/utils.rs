use chrono::Utc;
use chrono_tz::Europe::Istanbul;

use crate::consts::STEP;

/// Today's date in the chat's local time zone, `dd.mm.yyyy`.
pub fn today_istanbul() -> String {
    Utc::now().with_timezone(&Istanbul).format("%d.%m.%Y").to_string()
}

/// `00001 - 00011` style range text for a given start.
pub fn format_range(start: i64) -> String {
    format!("{:05} - {:05}", start, start + STEP - 1)
}

/// Full announcement body: requester name, date line, range.
pub fn format_announcement(user: &str, date: &str, from: i64) -> String {
    format!("{user}\n{date} {}", format_range(from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_zero_padded_to_five_digits() {
        assert_eq!(format_range(1), "00001 - 00011");
        assert_eq!(format_range(12), "00012 - 00022");
    }

    #[test]
    fn range_wider_than_five_digits_is_not_truncated() {
        assert_eq!(format_range(123456), "123456 - 123466");
    }

    #[test]
    fn announcement_puts_user_on_own_line() {
        let text = format_announcement("Ayşe Yılmaz", "05.03.2025", 10002);
        assert_eq!(text, "Ayşe Yılmaz\n05.03.2025 10002 - 10012");
    }

    #[test]
    fn date_has_dotted_layout() {
        let d = today_istanbul();
        assert_eq!(d.len(), 10);
        let bytes = d.as_bytes();
        assert_eq!(bytes[2], b'.');
        assert_eq!(bytes[5], b'.');
    }
}
