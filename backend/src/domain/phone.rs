//! Progressive phone number formatting.
//!
//! Digits are grouped as they are typed: up to nine digits use the local
//! `ddd ddd ddd` pattern, anything longer the international
//! `+ddd ddd ddd ddd` pattern. Only an exact run of 9 (local) or 12
//! (international) digits is regrouped; shorter inputs stay as bare digits and
//! digits past the pattern are appended unchanged.

const LOCAL_GROUPS: usize = 3;
const INTERNATIONAL_GROUPS: usize = 4;
const GROUP_LEN: usize = 3;
const LOCAL_MAX_DIGITS: usize = LOCAL_GROUPS * GROUP_LEN;

/// Reformat `raw` by stripping non-digits and grouping the digits.
///
/// # Examples
/// ```
/// use parking_backend::domain::format_phone;
///
/// assert_eq!(format_phone("912345678"), "912 345 678");
/// assert_eq!(format_phone("+351 912-345-678"), "+351 912 345 678");
/// assert_eq!(format_phone("9123456789"), "9123456789");
/// ```
#[must_use]
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() <= LOCAL_MAX_DIGITS {
        group_digits(&digits, LOCAL_GROUPS, "")
    } else {
        group_digits(&digits, INTERNATIONAL_GROUPS, "+")
    }
}

/// Regroup the leading `groups * GROUP_LEN` digits, keeping any remainder.
///
/// When there are too few digits the input is returned untouched.
fn group_digits(digits: &str, groups: usize, prefix: &str) -> String {
    let needed = groups * GROUP_LEN;
    if digits.len() < needed {
        return digits.to_owned();
    }

    // Input is ASCII digits only, so byte offsets are char boundaries.
    let (head, tail) = digits.split_at(needed);
    let grouped = head
        .as_bytes()
        .chunks(GROUP_LEN)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{prefix}{grouped}{tail}")
}
