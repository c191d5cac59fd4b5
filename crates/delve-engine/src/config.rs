//! Configuration for a session manager.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Configuration for a [`crate::SessionManager`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// RNG seed for reproducible sessions. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the random source this configuration describes.
    pub fn build_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
