use crate::error::CalendarError;

/// Transliterates Devanagari and ASCII digits to a number.
///
/// Every character must be a digit in one of the two scripts; a single
/// stray character rejects the whole string rather than yielding a partial
/// parse. Empty input is rejected too.
pub fn numeral_to_arabic(s: &str) -> Result<u32, CalendarError> {
    let invalid = || CalendarError::InvalidNumeral { input: s.to_string() };
    if s.is_empty() {
        return Err(invalid());
    }

    let mut value: u32 = 0;
    for c in s.chars() {
        let digit = devanagari_digit_value(c)
            .or_else(|| c.to_digit(10))
            .ok_or_else(invalid)?;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(invalid)?;
    }
    Ok(value)
}

/// Maps ASCII digits to Devanagari digits, leaving everything else alone so
/// separators survive (`"2082-08-17"` -> `"२०८२-०८-१७"`).
pub fn arabic_to_numeral(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '0'..='9' => devanagari_digit(c as u32 - '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

fn devanagari_digit_value(c: char) -> Option<u32> {
    match c {
        '०' => Some(0), '१' => Some(1), '२' => Some(2),
        '३' => Some(3), '४' => Some(4), '५' => Some(5),
        '६' => Some(6), '७' => Some(7), '८' => Some(8),
        '९' => Some(9),
        _ => None,
    }
}

fn devanagari_digit(n: u32) -> Option<char> {
    match n {
        0 => Some('०'), 1 => Some('१'), 2 => Some('२'),
        3 => Some('३'), 4 => Some('४'), 5 => Some('५'),
        6 => Some('६'), 7 => Some('७'), 8 => Some('८'),
        9 => Some('९'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devanagari_to_number() {
        assert_eq!(numeral_to_arabic("१७").unwrap(), 17);
        assert_eq!(numeral_to_arabic("२०८२").unwrap(), 2082);
        assert_eq!(numeral_to_arabic("०").unwrap(), 0);
    }

    #[test]
    fn ascii_and_mixed_digits_pass_through() {
        assert_eq!(numeral_to_arabic("17").unwrap(), 17);
        assert_eq!(numeral_to_arabic("१7").unwrap(), 17);
    }

    #[test]
    fn stray_characters_invalidate_everything() {
        for bad in ["", "१७ ", "1a", "-1", "१.५", "१७th"] {
            assert_eq!(
                numeral_to_arabic(bad).unwrap_err(),
                CalendarError::InvalidNumeral {
                    input: bad.to_string()
                },
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn overflow_is_invalid() {
        assert!(numeral_to_arabic("99999999999").is_err());
    }

    #[test]
    fn number_to_devanagari() {
        assert_eq!(arabic_to_numeral("17"), "१७");
        assert_eq!(arabic_to_numeral("2082-08-17"), "२०८२-०८-१७");
        assert_eq!(arabic_to_numeral("Poush"), "Poush");
    }

    #[test]
    fn round_trip_days() {
        for day in 1..=32u32 {
            let numeral = arabic_to_numeral(&day.to_string());
            assert_eq!(numeral_to_arabic(&numeral).unwrap(), day);
        }
    }
}
