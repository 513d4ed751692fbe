// SPDX-License-Identifier: Apache-2.0

use crate::strip_digits;

/// Display form for Brazilian phone numbers: area code in parentheses, then
/// a 4+4 split for up to 10 digits or a 5+4 split for longer (mobile)
/// numbers. Formatting only, no digit-count validation beyond the branch.
#[must_use]
pub fn format_phone(input: &str) -> String {
    let digits = strip_digits(input);
    let area_end = digits.len().min(2);
    let (area, rest) = digits.split_at(area_end);
    let split = if digits.len() <= 10 {
        rest.len().saturating_sub(4).min(4)
    } else {
        rest.len().saturating_sub(4)
    };
    let (prefix, suffix) = rest.split_at(split);
    format!("({area}) {prefix}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landline_gets_four_four_split() {
        assert_eq!(format_phone("1199998888"), "(11) 9999-8888");
        assert_eq!(format_phone("(11) 9999-8888"), "(11) 9999-8888");
    }

    #[test]
    fn mobile_gets_five_four_split() {
        assert_eq!(format_phone("11999998888"), "(11) 99999-8888");
        assert_eq!(format_phone("11 99999-8888"), "(11) 99999-8888");
    }

    #[test]
    fn short_input_still_produces_the_template() {
        assert_eq!(format_phone("118888"), "(11) -8888");
    }
}
