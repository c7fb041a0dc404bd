//! Version token generation.
//!
//! A build is identified by one random 16-digit decimal token. The token is
//! appended to asset URLs (`engine.wasm?4612…`) so browsers refetch the new
//! files after a deploy instead of serving stale cached copies.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lower bound of generated tokens (inclusive): 10^15.
pub const TOKEN_MIN: u64 = 1_000_000_000_000_000;

/// Upper bound of generated tokens (exclusive): 10^16.
pub const TOKEN_MAX: u64 = 10_000_000_000_000_000;

/// A cache-busting version token, printed as a plain decimal string.
///
/// Construction does not validate the value: generated tokens always fall in
/// `[TOKEN_MIN, TOKEN_MAX)`, but an explicitly supplied token (`--token`)
/// may carry any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionToken(u64);

impl VersionToken {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of version tokens for a build run.
///
/// The token is generated once at build start and threaded through every
/// substitution, so a run is fully determined by the single value this
/// returns.
pub trait TokenSource {
    fn next_token(&mut self) -> VersionToken;
}

/// Uniformly random tokens in `[TOKEN_MIN, TOKEN_MAX)`.
///
/// Not cryptographically secure; a collision across builds only means one
/// unnecessary cache hit.
pub struct RandomTokens {
    rng: StdRng,
}

impl RandomTokens {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for reproducible builds and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for RandomTokens {
    fn next_token(&mut self) -> VersionToken {
        VersionToken::new(self.rng.gen_range(TOKEN_MIN..TOKEN_MAX))
    }
}

/// Always yields the same token (`--token` flag, tests).
pub struct FixedToken(pub VersionToken);

impl TokenSource for FixedToken {
    fn next_token(&mut self) -> VersionToken {
        self.0
    }
}
