//! US phone number formatting applied on every edit of the phone field.

pub const PHONE_DIGITS: usize = 10;

pub fn phone_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Formats raw input as `(DDD) DDD-DDDD`, progressively while typing.
///
/// Up to three digits are returned as-is, four to six become `(DDD) D..`,
/// and anything longer is cut at ten digits.
pub fn format_phone_number(input: &str) -> String {
    let digits = phone_digits(input);
    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        len => format!(
            "({}) {}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..len.min(PHONE_DIGITS)]
        ),
    }
}
