use anyhow::{Result, bail};
use std::collections::HashSet;
use teahouse_game::decode_shift_code;

/// Seed resolved from a CLI token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// Shift code the seed was given as, if any
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    #[must_use]
    pub fn from_shift_code(seed: u64, code: &str) -> Self {
        Self {
            seed,
            code: Some(code.trim().to_uppercase()),
        }
    }

    /// Label used in reports: the shift code when known, else the number.
    #[must_use]
    pub fn label(&self) -> String {
        self.code.clone().unwrap_or_else(|| self.seed.to_string())
    }
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers and shift codes. Duplicate seeds keep the
/// first token that named them.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut resolved = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let info = if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if let Some(seed) = decode_shift_code(token) {
            SeedInfo::from_shift_code(seed, token)
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(1337));
    }

    Ok(resolved)
}

/// Split a comma separated CLI value into trimmed, non-empty tokens.
#[must_use]
pub fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_codes_resolve() {
        let tokens = split_csv("42, TS-SENCHA42 ,-7");
        let seeds = resolve_seed_inputs(&tokens).unwrap();
        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds[0].seed, 42);
        assert_eq!(seeds[0].label(), "42");
        assert_eq!(seeds[1].seed, decode_shift_code("TS-SENCHA42").unwrap());
        assert_eq!(seeds[1].code.as_deref(), Some("TS-SENCHA42"));
        assert_eq!(seeds[2].seed, 7);
    }

    #[test]
    fn duplicate_seeds_collapse() {
        let tokens = vec!["ts-sencha42".to_string(), "TS-SENCHA42".to_string()];
        let seeds = resolve_seed_inputs(&tokens).unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].label(), "TS-SENCHA42");
    }

    #[test]
    fn empty_input_falls_back_to_default_seed() {
        let seeds = resolve_seed_inputs(&split_csv(" , ")).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(1337)]);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = resolve_seed_inputs(&["not-a-seed".to_string()]).unwrap_err();
        assert!(err.to_string().contains("not-a-seed"));
    }
}
