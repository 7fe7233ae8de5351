use std::fmt;

/// Days in each month, 1-indexed. The game calendar has no leap years.
const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A game-calendar date, as written in save text: `year.month.day` with
/// no zero padding, e.g. `2200.1.1`.
///
/// Ordering is chronological:
///
/// ```
/// use clausewitz_save::SaveDate;
///
/// let start = SaveDate::new(2200, 1, 1).unwrap();
/// let later = SaveDate::new(2200, 12, 25).unwrap();
/// assert!(start < later);
/// assert_eq!(later.to_string(), "2200.12.25");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SaveDate {
    year: u16,
    month: u8,
    day: u8,
}

impl SaveDate {
    /// Build a date, validating the calendar: year and day start at 1,
    /// months run 1 to 12, and each month has its non-leap length.
    pub fn new(year: u16, month: u8, day: u8) -> Option<Self> {
        if year == 0 || month == 0 || month > 12 {
            return None;
        }
        if day == 0 || day > DAYS_PER_MONTH[usize::from(month)] {
            return None;
        }
        Some(SaveDate { year, month, day })
    }

    /// Parse the `y.M.d` form: one to four year digits, one or two month
    /// and day digits, nothing else.
    ///
    /// ```
    /// use clausewitz_save::SaveDate;
    ///
    /// assert_eq!(
    ///     SaveDate::parse_from_str("2200.1.1"),
    ///     SaveDate::new(2200, 1, 1),
    /// );
    /// assert_eq!(SaveDate::parse_from_str("2200.13.1"), None);
    /// assert_eq!(SaveDate::parse_from_str("not a date"), None);
    /// ```
    pub fn parse_from_str(text: &str) -> Option<Self> {
        let mut parts = text.split('.');
        let year = digits(parts.next()?, 4)?;
        let month = digits(parts.next()?, 2)?;
        let day = digits(parts.next()?, 2)?;
        if parts.next().is_some() {
            return None;
        }
        SaveDate::new(year as u16, month as u8, day as u8)
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

/// Parse an all-digit field of at most `max_len` characters.
fn digits(part: &str, max_len: usize) -> Option<u32> {
    if part.is_empty() || part.len() > max_len {
        return None;
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for SaveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("2200.1.1", Some((2200, 1, 1)))]
    #[case("1.1.1", Some((1, 1, 1)))]
    #[case("2250.12.31", Some((2250, 12, 31)))]
    #[case("2200.01.01", Some((2200, 1, 1)))]
    #[case("0.1.1", None)] // year zero
    #[case("2200.0.1", None)]
    #[case("2200.13.1", None)]
    #[case("2200.2.29", None)] // no leap years
    #[case("2200.4.31", None)]
    #[case("2200.1", None)] // missing day
    #[case("2200.1.1.5", None)] // too many fields
    #[case("22000.1.1", None)] // year too long
    #[case("2200.123.1", None)] // month too long
    #[case("2200.-1.1", None)]
    #[case("2200.a.1", None)]
    #[case("", None)]
    fn test_parse(#[case] input: &str, #[case] expected: Option<(u16, u8, u8)>) {
        let expected = expected.and_then(|(y, m, d)| SaveDate::new(y, m, d));
        assert_eq!(SaveDate::parse_from_str(input), expected);
    }

    #[rstest::rstest]
    fn test_display_is_unpadded() {
        let date = SaveDate::new(2200, 1, 9).unwrap();
        assert_eq!(date.to_string(), "2200.1.9");
    }

    #[rstest::rstest]
    fn test_ordering_is_chronological() {
        let a = SaveDate::new(2200, 12, 31).unwrap();
        let b = SaveDate::new(2201, 1, 1).unwrap();
        let c = SaveDate::new(2201, 1, 2).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[rstest::rstest]
    fn test_month_lengths() {
        assert!(SaveDate::new(2200, 1, 31).is_some());
        assert!(SaveDate::new(2200, 2, 28).is_some());
        assert!(SaveDate::new(2200, 6, 31).is_none());
    }
}
