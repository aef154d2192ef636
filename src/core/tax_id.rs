//! CNPJ (Brazilian company tax identifier) codec.
//!
//! A CNPJ is 14 decimal digits: a 12-digit base followed by two modulus-11
//! check digits, displayed as `NN.NNN.NNN/NNNN-NN`. Every function here is
//! pure and independent of locale or input device.

use crate::utils::error::{FreightError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

pub const TAX_ID_LEN: usize = 14;
pub const BASE_LEN: usize = 12;
/// 14 digits plus `.`, `.`, `/` and `-`.
pub const FORMATTED_LEN: usize = 18;

/// Strips every character that is not an ASCII digit.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Progressive punctuation for partially typed identifiers.
///
/// Digits beyond the 14th are dropped, so the output is never longer than
/// [`FORMATTED_LEN`] and `format(&format(x)) == format(x)`.
pub fn format(raw: &str) -> String {
    let mut digits = normalize(raw);
    digits.truncate(TAX_ID_LEN);
    let d = digits.as_str();

    match d.len() {
        0..=2 => digits,
        3..=5 => format!("{}.{}", &d[..2], &d[2..]),
        6..=8 => format!("{}.{}.{}", &d[..2], &d[2..5], &d[5..]),
        9..=12 => format!("{}.{}.{}/{}", &d[..2], &d[2..5], &d[5..8], &d[8..]),
        _ => format!(
            "{}.{}.{}/{}-{}",
            &d[..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..]
        ),
    }
}

/// Weighted modulus-11 digit. Weights cycle 2..=9 starting from the rightmost digit.
fn check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .rev()
        .zip((2..=9).cycle())
        .map(|(&digit, weight)| u32::from(digit) * weight)
        .sum();

    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        (11 - remainder) as u8
    }
}

fn to_digit_values(digits: &str) -> Vec<u8> {
    digits.bytes().map(|b| b - b'0').collect()
}

/// Computes both check digits for a 12-digit base.
pub fn compute_check_digits(base: &str) -> Result<(u8, u8)> {
    let digits = normalize(base);
    if digits.len() != BASE_LEN {
        return Err(FreightError::InvalidTaxId {
            value: base.to_string(),
        });
    }

    let mut values = to_digit_values(&digits);
    let first = check_digit(&values);
    values.push(first);
    let second = check_digit(&values);
    Ok((first, second))
}

pub fn is_valid(raw: &str) -> bool {
    let digits = normalize(raw);
    if digits.len() != TAX_ID_LEN {
        return false;
    }

    let values = to_digit_values(&digits);
    // 全部相同的數字 (例如 00000000000000) 雖然能通過檢查碼，但不是有效號碼
    if values.iter().all(|&v| v == values[0]) {
        return false;
    }

    let first = check_digit(&values[..BASE_LEN]);
    if first != values[BASE_LEN] {
        return false;
    }

    check_digit(&values[..BASE_LEN + 1]) == values[BASE_LEN + 1]
}

/// A CNPJ whose check digits have been verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxId {
    digits: String,
}

impl TaxId {
    pub fn parse(raw: &str) -> Result<Self> {
        if !is_valid(raw) {
            return Err(FreightError::InvalidTaxId {
                value: raw.to_string(),
            });
        }
        Ok(Self {
            digits: normalize(raw),
        })
    }

    /// The 14 bare digits.
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn base(&self) -> &str {
        &self.digits[..BASE_LEN]
    }

    pub fn check_digits(&self) -> &str {
        &self.digits[BASE_LEN..]
    }

    pub fn formatted(&self) -> String {
        format(&self.digits)
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl std::str::FromStr for TaxId {
    type Err = FreightError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for TaxId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "11.222.333/0001-81";

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(REFERENCE), "11222333000181");
        assert_eq!(normalize("a1b2 c3"), "123");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("１２"), "");
    }

    #[test]
    fn test_format_progressive_grouping() {
        assert_eq!(format(""), "");
        assert_eq!(format("1"), "1");
        assert_eq!(format("11"), "11");
        assert_eq!(format("112"), "11.2");
        assert_eq!(format("11222"), "11.222");
        assert_eq!(format("112223"), "11.222.3");
        assert_eq!(format("11222333"), "11.222.333");
        assert_eq!(format("112223330"), "11.222.333/0");
        assert_eq!(format("112223330001"), "11.222.333/0001");
        assert_eq!(format("1122233300018"), "11.222.333/0001-8");
        assert_eq!(format("11222333000181"), REFERENCE);
    }

    #[test]
    fn test_format_truncates_extra_digits() {
        assert_eq!(format("1122233300018199"), REFERENCE);
        assert_eq!(format("11.222.333/0001-8199").len(), FORMATTED_LEN);
    }

    #[test]
    fn test_format_is_idempotent() {
        let inputs = [
            "",
            "1",
            "12a3",
            "11.2",
            "112223",
            "11.222.333/0",
            "1122233300018",
            REFERENCE,
            "99999999999999999",
        ];
        for input in inputs {
            let once = format(input);
            assert_eq!(format(&once), once, "input {:?}", input);
            assert!(once.len() <= FORMATTED_LEN);
        }
    }

    #[test]
    fn test_reference_is_valid() {
        assert!(is_valid(REFERENCE));
        assert!(is_valid("11222333000181"));
    }

    #[test]
    fn test_repeated_digits_are_invalid() {
        for d in 0..=9 {
            let repeated = d.to_string().repeat(TAX_ID_LEN);
            assert!(!is_valid(&repeated), "{}", repeated);
        }
    }

    #[test]
    fn test_wrong_length_is_invalid() {
        assert!(!is_valid("1122233300018"));
        assert!(!is_valid("112223330001810"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_any_single_digit_mutation_is_invalid() {
        let digits: Vec<char> = normalize(REFERENCE).chars().collect();
        for position in 0..digits.len() {
            for replacement in '0'..='9' {
                if replacement == digits[position] {
                    continue;
                }
                let mut mutated = digits.clone();
                mutated[position] = replacement;
                let mutated: String = mutated.into_iter().collect();
                assert!(!is_valid(&mutated), "{} should be invalid", mutated);
            }
        }
    }

    #[test]
    fn test_compute_check_digits() {
        assert_eq!(compute_check_digits("11.222.333/0001").unwrap(), (8, 1));
        assert!(compute_check_digits("1122233300").is_err());
    }

    #[test]
    fn test_tax_id_accessors() {
        let id = TaxId::parse("11222333000181").unwrap();
        assert_eq!(id.as_str(), "11222333000181");
        assert_eq!(id.base(), "112223330001");
        assert_eq!(id.check_digits(), "81");
        assert_eq!(id.to_string(), REFERENCE);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"11222333000181\"");
        assert!("11.222.333/0001-82".parse::<TaxId>().is_err());
    }
}
