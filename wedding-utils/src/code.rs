//! Invitation code generation.
//!
//! Codes end up in printed cards and links guests type by hand, so they are
//! upper-case and skip the look-alike glyphs `0 O 1 I L`.
use rand::Rng;

const CODE_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V',
    'W', 'X', 'Y', 'Z', '2', '3', '4', '5', '6', '7', '8', '9',
];

pub const MIN_CODE_LEN: usize = 4;

/// Random invitation code of `len` characters (at least [`MIN_CODE_LEN`]).
pub fn invitation_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len.max(MIN_CODE_LEN))
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())])
        .collect()
}

/// Canonical form used for lookups: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length_and_alphabet() {
        let code = invitation_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| CODE_ALPHABET.contains(&c)));
    }

    #[test]
    fn test_code_min_length() {
        assert_eq!(invitation_code(1).len(), MIN_CODE_LEN);
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  ab12x "), "AB12X");
    }
}
