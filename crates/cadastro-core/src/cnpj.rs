// SPDX-License-Identifier: Apache-2.0

/// Digit count of a bare CNPJ: 12 base digits plus 2 check digits.
pub const CNPJ_DIGITS: usize = 14;

/// Length of the canonical punctuated form `NN.NNN.NNN/NNNN-NN`.
pub const CNPJ_DISPLAY_LEN: usize = 18;

#[must_use]
pub fn strip_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Canonical display form for a CNPJ. Inserts the fixed separators when the
/// input carries at most 14 digits; longer digit strings are returned bare,
/// never truncated. Display transform only, never rejects.
#[must_use]
pub fn format_cnpj(input: &str) -> String {
    let digits = strip_digits(input);
    if digits.len() > CNPJ_DIGITS {
        return digits;
    }
    let mut out = String::with_capacity(CNPJ_DISPLAY_LEN);
    for (idx, c) in digits.chars().enumerate() {
        match idx {
            2 | 5 => out.push('.'),
            8 => out.push('/'),
            12 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Weighted check-digit sum. Weights start at `start_weight`, decrement each
/// position, and wrap from 2 back to 9.
fn check_digit(digits: &[u8], start_weight: u32) -> u8 {
    let mut weight = start_weight;
    let mut sum: u32 = 0;
    for &d in digits {
        sum += u32::from(d) * weight;
        weight = if weight == 2 { 9 } else { weight - 1 };
    }
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        (11 - remainder) as u8
    }
}

/// Full syntactic and arithmetic validation of a free-form CNPJ string.
///
/// Strips punctuation first, so both bare and display forms are accepted.
/// Rejects anything that does not reduce to exactly 14 digits, degenerate
/// all-identical sequences, and any mismatch in either of the two modulo-11
/// check digits.
#[must_use]
pub fn validate_cnpj(input: &str) -> bool {
    let stripped = strip_digits(input);
    if stripped.len() != CNPJ_DIGITS {
        return false;
    }
    let digits: Vec<u8> = stripped.bytes().map(|b| b - b'0').collect();
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    if check_digit(&digits[..12], 5) != digits[12] {
        return false;
    }
    check_digit(&digits[..13], 6) == digits[13]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_inserts_separators_at_fixed_positions() {
        assert_eq!(format_cnpj("11444777000161"), "11.444.777/0001-61");
        assert_eq!(format_cnpj("11.444.777/0001-61"), "11.444.777/0001-61");
    }

    #[test]
    fn format_handles_partial_input_without_padding() {
        assert_eq!(format_cnpj(""), "");
        assert_eq!(format_cnpj("11"), "11");
        assert_eq!(format_cnpj("114"), "11.4");
        assert_eq!(format_cnpj("114447770"), "11.444.777/0");
    }

    #[test]
    fn format_leaves_overlong_digit_strings_bare() {
        assert_eq!(format_cnpj("114447770001619"), "114447770001619");
    }

    #[test]
    fn validate_accepts_known_good_cnpjs() {
        assert!(validate_cnpj("11.444.777/0001-61"));
        assert!(validate_cnpj("11444777000161"));
        assert!(validate_cnpj("11.222.333/0001-81"));
        assert!(validate_cnpj("12.345.678/0001-95"));
    }

    #[test]
    fn validate_rejects_corrupted_check_digits() {
        assert!(!validate_cnpj("11.444.777/0001-62"));
        assert!(!validate_cnpj("11.444.777/0001-71"));
    }

    #[test]
    fn validate_rejects_wrong_digit_counts() {
        assert!(!validate_cnpj(""));
        assert!(!validate_cnpj("1144477700016"));
        assert!(!validate_cnpj("114447770001611"));
        assert!(!validate_cnpj("abc"));
    }

    #[test]
    fn validate_rejects_degenerate_sequences() {
        assert!(!validate_cnpj("00.000.000/0000-00"));
        assert!(!validate_cnpj("11111111111111"));
        assert!(!validate_cnpj("99999999999999"));
    }

    #[test]
    fn strip_digits_drops_everything_but_ascii_digits() {
        assert_eq!(strip_digits("(11) 9999-8888"), "1199998888");
        assert_eq!(strip_digits("no digits"), "");
    }
}
