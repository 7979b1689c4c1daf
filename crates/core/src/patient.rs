//! Patient field rules: CPF normalisation and check digits, gender values,
//! and Brazilian state codes.

use std::borrow::Cow;

use validator::ValidationError;

/// Number of digits in a CPF.
pub const CPF_LENGTH: usize = 11;

pub const GENDER_MALE: &str = "male";
pub const GENDER_FEMALE: &str = "female";
pub const GENDER_OTHER: &str = "other";

/// All accepted gender values.
pub const VALID_GENDERS: &[&str] = &[GENDER_MALE, GENDER_FEMALE, GENDER_OTHER];

/// Two-letter federative unit codes.
pub const VALID_STATES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

// ---------------------------------------------------------------------------
// CPF
// ---------------------------------------------------------------------------

/// Strip punctuation (`.`, `-`, spaces) from a CPF, keeping digits only.
pub fn normalize_cpf(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Compute the two check digits for the first nine digits of a CPF.
fn check_digits(base: &[u32]) -> (u32, u32) {
    let digit = |slice: &[u32], start_weight: u32| {
        let sum: u32 = slice
            .iter()
            .enumerate()
            .map(|(i, d)| d * (start_weight - i as u32))
            .sum();
        let rem = (sum * 10) % 11;
        if rem == 10 {
            0
        } else {
            rem
        }
    };

    let first = digit(&base[..9], 10);
    let mut with_first = base[..9].to_vec();
    with_first.push(first);
    let second = digit(&with_first, 11);
    (first, second)
}

/// Returns `true` if `raw` is a well-formed CPF after normalisation.
///
/// Rejects wrong lengths, sequences of one repeated digit, and bad check
/// digits.
pub fn is_valid_cpf(raw: &str) -> bool {
    let cpf = normalize_cpf(raw);
    if cpf.len() != CPF_LENGTH {
        return false;
    }
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }
    let (first, second) = check_digits(&digits);
    digits[9] == first && digits[10] == second
}

/// Append the check digits to a nine-digit CPF base.
///
/// Returns `None` if `base` does not contain exactly nine digits.
pub fn complete_cpf(base: &str) -> Option<String> {
    let digits: Vec<u32> = normalize_cpf(base)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    if digits.len() != 9 {
        return None;
    }
    let (first, second) = check_digits(&digits);
    let mut out: String = digits.iter().map(|d| char::from(b'0' + *d as u8)).collect();
    out.push(char::from(b'0' + first as u8));
    out.push(char::from(b'0' + second as u8));
    Some(out)
}

/// Render a normalised CPF as `000.000.000-00`. Inputs that are not eleven
/// digits are returned unchanged.
pub fn format_cpf(cpf: &str) -> String {
    let digits = normalize_cpf(cpf);
    if digits.len() != CPF_LENGTH {
        return cpf.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

// ---------------------------------------------------------------------------
// Field validators (used from `#[validate(custom(...))]`)
// ---------------------------------------------------------------------------

fn invalid(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

/// Field validator for CPF values.
pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    if is_valid_cpf(value) {
        Ok(())
    } else {
        Err(invalid("cpf", "Invalid CPF".to_string()))
    }
}

/// Field validator for gender values.
pub fn validate_gender(value: &str) -> Result<(), ValidationError> {
    if VALID_GENDERS.contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            "gender",
            format!(
                "Invalid gender '{value}'. Must be one of: {}",
                VALID_GENDERS.join(", ")
            ),
        ))
    }
}

/// Field validator for state codes. Case-insensitive.
pub fn validate_state(value: &str) -> Result<(), ValidationError> {
    let upper = value.to_ascii_uppercase();
    if VALID_STATES.contains(&upper.as_str()) {
        Ok(())
    } else {
        Err(invalid("state", format!("Invalid state code '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize_cpf("529.982.247-25"), "52998224725");
        assert_eq!(normalize_cpf(" 529 982 247 25 "), "52998224725");
    }

    #[test]
    fn accepts_known_valid_cpfs() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("11144477735"));
    }

    #[test]
    fn rejects_bad_check_digits() {
        assert!(!is_valid_cpf("529.982.247-26"));
        assert!(!is_valid_cpf("11144477734"));
    }

    #[test]
    fn rejects_repeated_digits_and_wrong_length() {
        assert!(!is_valid_cpf("000.000.000-00"));
        assert!(!is_valid_cpf("99999999999"));
        assert!(!is_valid_cpf("1234567890"));
        assert!(!is_valid_cpf(""));
    }

    #[test]
    fn complete_cpf_produces_valid_numbers() {
        assert_eq!(complete_cpf("529982247").as_deref(), Some("52998224725"));
        assert_eq!(complete_cpf("111444777").as_deref(), Some("11144477735"));
        for base in ["123456789", "987654321", "300200100"] {
            let cpf = complete_cpf(base).unwrap();
            assert!(is_valid_cpf(&cpf), "{cpf} should validate");
        }
        assert!(complete_cpf("12345").is_none());
    }

    #[test]
    fn format_cpf_inserts_separators() {
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cpf("123"), "123");
    }

    #[test]
    fn gender_and_state_validators() {
        assert!(validate_gender("female").is_ok());
        assert!(validate_gender("F").is_err());
        assert!(validate_state("sp").is_ok());
        assert!(validate_state("RJ").is_ok());
        assert!(validate_state("XX").is_err());
    }
}
