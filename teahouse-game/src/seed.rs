//! Shift codes: shareable names for session seeds.
//! Format: TS-<WORD><NN>, e.g., TS-SENCHA42, TS-OOLONG07

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const CODE_PREFIX: &str = "TS";
const SEED_DOMAIN: &[u8] = b"teahouse/shift-code";
const NUMBER_SPAN: u8 = 100;

pub const WORD_LIST: [&str; 64] = [
    "SENCHA", "MATCHA", "GYOKURO", "BANCHA", "HOJICHA", "GENMAI", "KUKICHA", "OOLONG", "PUERH",
    "ASSAM", "CEYLON", "YUNNAN", "KEEMUN", "LAPSANG", "DARJEEL", "NILGIRI", "JASMINE", "PEONY",
    "NEEDLE", "DRAGON", "GODDESS", "ROBE", "BEAUTY", "PEARL", "LEAF", "BUD", "STEEP", "KETTLE",
    "GAIWAN", "KYUSU", "YIXING", "TEAPOT", "CUP", "SAUCER", "TRAY", "WHISK", "SCOOP", "CADDY",
    "INFUSE", "AROMA", "LIQUOR", "BREW", "STEAM", "MIST", "VALLEY", "FOREST", "GROVE", "MOUNTAIN",
    "TERRACE", "HARVEST", "FLUSH", "PLUCK", "WITHER", "ROLL", "ROAST", "FIRE", "CLAY", "SILVER",
    "BAMBOO", "LOTUS", "HONEY", "MINT", "CHAI", "MASALA",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShiftCodeError {
    #[error("shift code must start with `TS-`")]
    MissingPrefix,
    #[error("`{0}` is not a shift-code word")]
    UnknownWord(String),
    #[error("shift code must end in two digits")]
    BadNumber,
}

/// One word of the vocabulary plus a two-digit number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftCode {
    word: u8,
    number: u8,
}

impl ShiftCode {
    /// Build a code from a vocabulary index and a number below 100.
    #[must_use]
    pub fn new(word: usize, number: u8) -> Option<Self> {
        if word >= WORD_LIST.len() || number >= NUMBER_SPAN {
            return None;
        }
        Some(Self {
            word: u8::try_from(word).ok()?,
            number,
        })
    }

    /// Read the code stored in the low 16 bits of `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let [number, word, ..] = seed.to_le_bytes();
        Self {
            word: word % 64,
            number: number % NUMBER_SPAN,
        }
    }

    #[must_use]
    pub fn word(self) -> &'static str {
        WORD_LIST[usize::from(self.word)]
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.number
    }

    /// Seed named by this code. The high bits come from a SHA-256 digest,
    /// the low 16 bits hold the code itself so it can be read back.
    #[must_use]
    pub fn seed(self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(SEED_DOMAIN);
        hasher.update([self.word, self.number]);
        let digest = hasher.finalize();
        let mut high = [0u8; 8];
        high.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(high) & !0xFFFF) | (u64::from(self.word) << 8) | u64::from(self.number)
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CODE_PREFIX}-{}{:02}", self.word(), self.number)
    }
}

impl FromStr for ShiftCode {
    type Err = ShiftCodeError;

    /// Case is ignored, as are non-letters in the word part.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, rest) = s.trim().split_once('-').ok_or(ShiftCodeError::MissingPrefix)?;
        if !prefix.eq_ignore_ascii_case(CODE_PREFIX) {
            return Err(ShiftCodeError::MissingPrefix);
        }
        let split = rest
            .len()
            .checked_sub(2)
            .filter(|at| rest.is_char_boundary(*at))
            .ok_or(ShiftCodeError::BadNumber)?;
        let (word_part, digits) = rest.split_at(split);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ShiftCodeError::BadNumber);
        }
        let number: u8 = digits.parse().map_err(|_| ShiftCodeError::BadNumber)?;

        let word: String = word_part
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        let index = WORD_LIST
            .iter()
            .position(|candidate| *candidate == word)
            .ok_or_else(|| ShiftCodeError::UnknownWord(word_part.to_string()))?;
        Self::new(index, number).ok_or(ShiftCodeError::BadNumber)
    }
}

/// Render the low 16 bits of `seed` as a shift code.
#[must_use]
pub fn encode_shift_code(seed: u64) -> String {
    ShiftCode::from_seed(seed).to_string()
}

/// Decode a shift code into its seed.
#[must_use]
pub fn decode_shift_code(code: &str) -> Option<u64> {
    code.parse::<ShiftCode>().ok().map(ShiftCode::seed)
}

/// Derive a fresh shift code from arbitrary entropy.
#[must_use]
pub fn shift_code_from_entropy(entropy: u64) -> String {
    let word = usize::try_from(entropy % 64).unwrap_or(0);
    let number = u8::try_from((entropy >> 17) % 100).unwrap_or(0);
    ShiftCode::new(word, number)
        .map(|code| code.to_string())
        .unwrap_or_else(|| encode_shift_code(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoded_seed_reencodes_to_same_code() {
        let seed = decode_shift_code("TS-SENCHA42").unwrap();
        assert_eq!(encode_shift_code(seed), "TS-SENCHA42");
    }

    #[test]
    fn decoding_ignores_case_and_punctuation() {
        let canonical = decode_shift_code("TS-OOLONG07").unwrap();
        assert_eq!(decode_shift_code("ts-oo.long07"), Some(canonical));
        assert_eq!(decode_shift_code("  Ts-Oolong07 "), Some(canonical));
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert_eq!(
            "SENCHA42".parse::<ShiftCode>(),
            Err(ShiftCodeError::MissingPrefix)
        );
        assert_eq!(
            "DP-SENCHA42".parse::<ShiftCode>(),
            Err(ShiftCodeError::MissingPrefix)
        );
        assert!(matches!(
            "TS-COFFEE42".parse::<ShiftCode>(),
            Err(ShiftCodeError::UnknownWord(_))
        ));
        assert_eq!(
            "TS-SENCHA4x".parse::<ShiftCode>(),
            Err(ShiftCodeError::BadNumber)
        );
        assert!(decode_shift_code("TS-42").is_none());
        assert!(decode_shift_code("TS-").is_none());
    }

    #[test]
    fn every_code_round_trips_through_its_seed() {
        for word in 0..WORD_LIST.len() {
            for number in [0u8, 7, 99] {
                let code = ShiftCode::new(word, number).unwrap();
                assert_eq!(ShiftCode::from_seed(code.seed()), code);
                assert_eq!(code.to_string().parse::<ShiftCode>(), Ok(code));
            }
        }
        assert!(ShiftCode::new(64, 0).is_none());
        assert!(ShiftCode::new(0, 100).is_none());
    }

    #[test]
    fn distinct_codes_name_distinct_seeds() {
        let a = ShiftCode::new(0, 42).unwrap().seed();
        let b = ShiftCode::new(0, 43).unwrap().seed();
        assert_ne!(a, b);
        assert_ne!(a >> 16, b >> 16);
    }

    #[test]
    fn entropy_codes_decode() {
        for entropy in [0u64, 1, 0xDEAD_BEEF, u64::MAX] {
            let code = shift_code_from_entropy(entropy);
            let seed = decode_shift_code(&code).unwrap();
            assert_eq!(encode_shift_code(seed), code);
        }
    }

    #[test]
    fn word_list_is_unique_letters_only() {
        for (i, word) in WORD_LIST.iter().enumerate() {
            assert!(word.bytes().all(|b| b.is_ascii_uppercase()));
            assert!(!WORD_LIST[i + 1..].contains(word));
        }
    }
}
