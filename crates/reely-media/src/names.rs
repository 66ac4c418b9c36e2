//! Random asset name generation.

use crate::error::{MediaError, MediaResult};
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Generate a random hex asset name from `num_bytes` of OS entropy.
///
/// Entropy source failure is propagated; a degenerate name is never
/// returned.
pub fn random_hex_name(num_bytes: usize) -> MediaResult<String> {
    let mut buf = vec![0u8; num_bytes];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| MediaError::Entropy(e.to_string()))?;
    Ok(hex::encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_matches_bytes() {
        assert_eq!(random_hex_name(16).unwrap().len(), 32);
        assert_eq!(random_hex_name(32).unwrap().len(), 64);
    }

    #[test]
    fn test_names_are_hex() {
        let name = random_hex_name(16).unwrap();
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_names_are_unique() {
        let a = random_hex_name(16).unwrap();
        let b = random_hex_name(16).unwrap();
        assert_ne!(a, b);
    }
}
