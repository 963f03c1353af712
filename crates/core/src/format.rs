//! Payment field input formatters.
//!
//! These normalize what a shopper types into the canonical display form the
//! validators expect. All of them are idempotent.

const CARD_NUMBER_DIGITS: usize = 16;
const CVV_DIGITS: usize = 4;
const GCASH_NUMBER_DIGITS: usize = 11;

fn digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Card number as up to four space-separated groups of four digits.
///
/// ```
/// use cookie_haven_core::format::card_number;
///
/// assert_eq!(card_number("4242-4242 4242x4242"), "4242 4242 4242 4242");
/// assert_eq!(card_number("424242"), "4242 42");
/// ```
#[must_use]
pub fn card_number(input: &str) -> String {
    let digits = digits(input, CARD_NUMBER_DIGITS);
    let mut out = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Expiry date as `MM/YY`; the slash appears once two digits are typed.
#[must_use]
pub fn expiry_date(input: &str) -> String {
    let digits = digits(input, 4);
    if digits.len() < 2 {
        return digits;
    }
    let (month, year) = digits.split_at(2);
    format!("{month}/{year}")
}

/// CVV as at most four digits.
#[must_use]
pub fn cvv(input: &str) -> String {
    digits(input, CVV_DIGITS)
}

/// GCash mobile number grouped as `XXXX XXX XXXX`.
#[must_use]
pub fn gcash_number(input: &str) -> String {
    let digits = digits(input, GCASH_NUMBER_DIGITS);
    let (prefix, rest) = digits.split_at(digits.len().min(4));
    let (middle, tail) = rest.split_at(rest.len().min(3));
    [prefix, middle, tail]
        .into_iter()
        .filter(|group| !group.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_groups_and_strips() {
        assert_eq!(card_number(""), "");
        assert_eq!(card_number("4242"), "4242");
        assert_eq!(card_number("42424"), "4242 4");
        assert_eq!(card_number("4242 4242 4242 4242"), "4242 4242 4242 4242");
        assert_eq!(card_number("4242/4242.4242-4242"), "4242 4242 4242 4242");
    }

    #[test]
    fn test_card_number_truncates_to_sixteen_digits() {
        assert_eq!(card_number("12345678901234567890"), "1234 5678 9012 3456");
    }

    #[test]
    fn test_card_number_is_idempotent() {
        let once = card_number("4000056655665556");
        assert_eq!(card_number(&once), once);
    }

    #[test]
    fn test_expiry_date() {
        assert_eq!(expiry_date("1"), "1");
        assert_eq!(expiry_date("12"), "12/");
        assert_eq!(expiry_date("122"), "12/2");
        assert_eq!(expiry_date("12/29"), "12/29");
        assert_eq!(expiry_date("122999"), "12/29");
    }

    #[test]
    fn test_cvv() {
        assert_eq!(cvv("1a2b3"), "123");
        assert_eq!(cvv("123456"), "1234");
    }

    #[test]
    fn test_gcash_number() {
        assert_eq!(gcash_number("091"), "091");
        assert_eq!(gcash_number("0917"), "0917");
        assert_eq!(gcash_number("091712"), "0917 12");
        assert_eq!(gcash_number("09171234567"), "0917 123 4567");
        assert_eq!(gcash_number("0917-123-4567-99"), "0917 123 4567");
    }
}
