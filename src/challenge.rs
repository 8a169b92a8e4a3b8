//! Challenge generation and answer checking.

use crate::config::ChallengeConfig;
use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rand::RngCore;

/// Draws random challenge strings from a fixed alphabet.
#[derive(Debug, Clone)]
pub struct ChallengeSource {
    length: usize,
    alphabet: Vec<char>,
}

impl ChallengeSource {
    /// Create a source producing `length` characters from `alphabet`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyAlphabet`] if `alphabet` has no characters.
    /// - [`Error::EmptyChallenge`] if `length` is zero.
    pub fn new(length: usize, alphabet: &str) -> Result<Self> {
        let alphabet: Vec<char> = alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        if length == 0 {
            return Err(Error::EmptyChallenge);
        }
        Ok(Self { length, alphabet })
    }

    /// Create a source from the challenge section of the config.
    ///
    /// # Errors
    ///
    /// Same as [`ChallengeSource::new`].
    pub fn from_config(config: &ChallengeConfig) -> Result<Self> {
        Self::new(config.length, &config.alphabet)
    }

    /// The alphabet characters are drawn from.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// A fresh challenge from the operating system's generator.
    pub fn generate(&self) -> String {
        self.generate_with(&mut OsRng)
    }

    /// A fresh challenge from `rng`.
    ///
    /// Each character is `alphabet[byte % len]` for one random byte. The
    /// slight bias toward the first `256 % len` characters is accepted.
    pub fn generate_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> String {
        let mut bytes = vec![0u8; self.length];
        rng.fill_bytes(&mut bytes);
        bytes
            .iter()
            .map(|&b| self.alphabet[usize::from(b) % self.alphabet.len()])
            .collect()
    }
}

impl Default for ChallengeSource {
    fn default() -> Self {
        let config = ChallengeConfig::default();
        Self {
            length: config.length,
            alphabet: config.alphabet.chars().collect(),
        }
    }
}

/// Outcome of checking an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The answer matched.
    Passed,
    /// The answer did not match, or there was nothing to match.
    Failed,
}

impl Verdict {
    /// Whether the answer matched.
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Text to show the user.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Passed => "Verification passed.",
            Self::Failed => "Verification failed. Please try again.",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Compare an answer to the challenge.
///
/// Surrounding whitespace is ignored and the comparison is case-insensitive.
pub fn verify(input: &str, challenge: &str) -> Verdict {
    if input.trim().to_uppercase() == challenge.to_uppercase() {
        Verdict::Passed
    } else {
        Verdict::Failed
    }
}
