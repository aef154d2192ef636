use freight_quote::core::tax_id::{self, compute_check_digits, TaxId, FORMATTED_LEN, TAX_ID_LEN};

const REFERENCE: &str = "11.222.333/0001-81";

/// Builds a valid CNPJ from a 12-digit base.
fn complete(base: &str) -> String {
    let (first, second) = compute_check_digits(base).unwrap();
    format!("{}{}{}", base, first, second)
}

#[test]
fn test_reference_identifier_round_trips_through_format() {
    let digits = tax_id::normalize(REFERENCE);
    assert_eq!(digits.len(), TAX_ID_LEN);
    assert_eq!(tax_id::format(&digits), REFERENCE);
    assert!(tax_id::is_valid(&digits));
    assert!(tax_id::is_valid(REFERENCE));
}

#[test]
fn test_every_prefix_formats_idempotently() {
    let digits = "1122233300018199";
    for end in 0..=digits.len() {
        let once = tax_id::format(&digits[..end]);
        assert_eq!(tax_id::format(&once), once);
        assert!(once.len() <= FORMATTED_LEN, "{} too long", once);
    }
}

#[test]
fn test_generated_identifiers_validate() {
    let bases = ["000000000001", "123456780001", "987654320001", "457681920001"];
    for base in bases {
        let cnpj = complete(base);
        assert!(tax_id::is_valid(&cnpj), "{}", cnpj);
        assert!(TaxId::parse(&tax_id::format(&cnpj)).is_ok());
    }
}

#[test]
fn test_check_digit_sensitivity_on_generated_identifier() {
    let cnpj = complete("123456780001");
    let digits: Vec<u8> = cnpj.bytes().collect();
    for position in 0..digits.len() {
        let mut mutated = digits.clone();
        mutated[position] = if mutated[position] == b'9' { b'0' } else { mutated[position] + 1 };
        let mutated = String::from_utf8(mutated).unwrap();
        assert!(!tax_id::is_valid(&mutated), "{} accepted", mutated);
    }
}

#[test]
fn test_repeated_digit_sequences_are_rejected() {
    for digit in '0'..='9' {
        let repeated: String = std::iter::repeat(digit).take(TAX_ID_LEN).collect();
        assert!(!tax_id::is_valid(&repeated));
        assert!(!tax_id::is_valid(&tax_id::format(&repeated)));
        assert!(TaxId::parse(&repeated).is_err());
    }
}

#[test]
fn test_punctuation_and_noise_are_ignored() {
    assert!(tax_id::is_valid(" 11 222 333 0001 81 "));
    assert!(tax_id::is_valid("11-222-333-0001/81"));
    assert!(!tax_id::is_valid("11.222.333/0001-8"));
}
