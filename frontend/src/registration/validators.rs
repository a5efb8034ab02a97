use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

pub const REQUIRED: &str = "This field is required";
pub const TELEGRAM_REQUIRED: &str = "Please enter your Telegram username";
pub const TELEGRAM_PREFIX: &str = "Telegram username must start with @";
pub const INVALID_NUMBER: &str = "Please enter a whole number";
pub const INVALID_TIME: &str = "Use the h:mm:ss format, for example 1:45:00";
pub const INVALID_DATE: &str = "Please pick a valid date";

// One or two hour digits; a two-digit hour stays below 24.
static TARGET_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]|[01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9]$").unwrap());

pub type Check = Result<(), &'static str>;

pub fn required(value: &str) -> Check {
    if value.trim().is_empty() {
        Err(REQUIRED)
    } else {
        Ok(())
    }
}

/// Presence first, then the `@` prefix, each with its own message.
pub fn telegram_username(value: &str) -> Check {
    let value = value.trim();
    if value.is_empty() {
        return Err(TELEGRAM_REQUIRED);
    }
    if !value.starts_with('@') {
        return Err(TELEGRAM_PREFIX);
    }
    Ok(())
}

pub fn target_time(value: &str) -> Check {
    required(value)?;
    if TARGET_TIME.is_match(value.trim()) {
        Ok(())
    } else {
        Err(INVALID_TIME)
    }
}

/// Any integer passes; there is no domain range check.
pub fn integer(value: &str) -> Check {
    required(value)?;
    value.trim().parse::<i64>().map(|_| ()).map_err(|_| INVALID_NUMBER)
}

pub fn date(value: &str) -> Check {
    required(value)?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| INVALID_DATE)
}

pub fn selected<T>(value: Option<T>) -> Check {
    value.map(|_| ()).ok_or(REQUIRED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_time_accepts_one_and_two_digit_hours() {
        assert_eq!(target_time("1:45:00"), Ok(()));
        assert_eq!(target_time("03:59:59"), Ok(()));
        assert_eq!(target_time(" 0:25:30 "), Ok(()));
    }

    #[test]
    fn target_time_rejects_out_of_range_parts() {
        assert_eq!(target_time("99:00:00"), Err(INVALID_TIME));
        assert_eq!(target_time("1:75:00"), Err(INVALID_TIME));
        assert_eq!(target_time("1:45:60"), Err(INVALID_TIME));
        assert_eq!(target_time("123:00:00"), Err(INVALID_TIME));
        assert_eq!(target_time("1:5:00"), Err(INVALID_TIME));
        assert_eq!(target_time("1h45"), Err(INVALID_TIME));
    }

    #[test]
    fn empty_target_time_reports_required() {
        assert_eq!(target_time("  "), Err(REQUIRED));
    }

    #[test]
    fn telegram_username_checks_presence_before_prefix() {
        assert_eq!(telegram_username(""), Err(TELEGRAM_REQUIRED));
        assert_eq!(telegram_username("   "), Err(TELEGRAM_REQUIRED));
        assert_eq!(telegram_username("ivan"), Err(TELEGRAM_PREFIX));
        assert_ne!(TELEGRAM_REQUIRED, TELEGRAM_PREFIX);
        assert_eq!(telegram_username("@ivan"), Ok(()));
    }

    #[test]
    fn integer_has_no_range_bound() {
        assert_eq!(integer("42"), Ok(()));
        assert_eq!(integer("-3"), Ok(()));
        assert_eq!(integer("100000"), Ok(()));
        assert_eq!(integer("4.5"), Err(INVALID_NUMBER));
        assert_eq!(integer("abc"), Err(INVALID_NUMBER));
        assert_eq!(integer(""), Err(REQUIRED));
    }

    #[test]
    fn date_requires_iso_format() {
        assert_eq!(date("2026-05-03"), Ok(()));
        assert_eq!(date("03.05.2026"), Err(INVALID_DATE));
        assert_eq!(date("2026-02-30"), Err(INVALID_DATE));
    }

    #[test]
    fn required_trims_whitespace() {
        assert_eq!(required(" \t"), Err(REQUIRED));
        assert_eq!(required(" x "), Ok(()));
        assert_eq!(selected(None::<u8>), Err(REQUIRED));
        assert_eq!(selected(Some(1)), Ok(()));
    }
}
