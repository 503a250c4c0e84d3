//! Injectable randomness for domain labels, passwords and ports.
//!
//! Generators never reach for a global RNG. They draw from the
//! [`RandomSource`] carried by their [`GeneratorContext`](crate::GeneratorContext),
//! so production uses [`ThreadRandom`] while tests pin output with
//! [`SeededRandom`].

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Lowercase alphanumerics, safe inside DNS labels.
pub const LOWER_ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Mixed-case alphanumerics used for passwords.
pub const ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Lowest port handed out by [`random_port`].
pub const MIN_RANDOM_PORT: u16 = 1024;

/// A source of random bytes that can be shared across threads.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Thread-local, OS-seeded randomness for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::thread_rng().fill_bytes(dest);
    }
}

/// Deterministic randomness from a fixed seed.
///
/// Two sources built from the same seed yield the same byte stream, which
/// makes whole-template output reproducible in tests and in `--seed` runs.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.fill_bytes(dest);
    }
}

/// Draw `len` characters uniformly from `charset`.
///
/// Uses rejection sampling so every character is equally likely.
/// `charset` must hold between 1 and 256 bytes.
pub fn sample_chars(random: &dyn RandomSource, charset: &[u8], len: usize) -> String {
    debug_assert!(!charset.is_empty() && charset.len() <= 256);
    let width = charset.len();
    let limit = 256 - (256 % width);
    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 32];

    while out.len() < len {
        random.fill_bytes(&mut buf);
        for &byte in &buf {
            if (byte as usize) < limit {
                out.push(charset[byte as usize % width] as char);
                if out.len() == len {
                    break;
                }
            }
        }
    }

    out
}

/// Random lowercase alphanumeric token, valid inside a DNS label.
pub fn random_token(random: &dyn RandomSource, len: usize) -> String {
    sample_chars(random, LOWER_ALNUM, len)
}

/// Random mixed-case alphanumeric password.
pub fn generate_password(random: &dyn RandomSource, len: usize) -> String {
    sample_chars(random, ALNUM, len)
}

/// Random unprivileged TCP port in `1024..=65535`.
pub fn random_port(random: &dyn RandomSource) -> u16 {
    let mut buf = [0u8; 2];
    random.fill_bytes(&mut buf);
    let span = u32::from(u16::MAX - MIN_RANDOM_PORT) + 1;
    let offset = u32::from(u16::from_be_bytes(buf)) % span;
    MIN_RANDOM_PORT + offset as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(7);
        let b = SeededRandom::new(7);
        assert_eq!(random_token(&a, 12), random_token(&b, 12));
    }

    #[test]
    fn test_seeded_random_differs_by_seed() {
        let a = SeededRandom::new(1);
        let b = SeededRandom::new(2);
        assert_ne!(random_token(&a, 16), random_token(&b, 16));
    }

    #[test]
    fn test_random_token_charset() {
        let token = random_token(&ThreadRandom, 64);
        assert_eq!(token.len(), 64);
        assert!(token.bytes().all(|b| LOWER_ALNUM.contains(&b)));
    }

    #[test]
    fn test_password_length_and_charset() {
        for len in [6, 8, 12, 16, 32] {
            let password = generate_password(&ThreadRandom, len);
            assert_eq!(password.len(), len);
            assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_random_port_range() {
        let random = SeededRandom::new(99);
        for _ in 0..500 {
            assert!(random_port(&random) >= MIN_RANDOM_PORT);
        }
    }
}
