use uuid::Uuid;

/// Block id source
///
/// `Random` ids are safe across sessions editing the same stored page.
/// `Sequential` ids (`{seed}-{n}`) are deterministic and meant for tests
/// and tooling that build documents from scratch.
#[derive(Debug, Clone)]
pub enum IdGenerator {
    Random,
    Sequential { seed: String, count: u64 },
}

impl IdGenerator {
    pub fn random() -> Self {
        Self::Random
    }

    pub fn sequential(seed: impl Into<String>) -> Self {
        Self::Sequential {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next id
    pub fn new_id(&mut self) -> String {
        match self {
            Self::Random => Uuid::new_v4().to_string(),
            Self::Sequential { seed, count } => {
                *count += 1;
                format!("{}-{}", seed, count)
            }
        }
    }

    /// Seed of a sequential generator
    pub fn seed(&self) -> Option<&str> {
        match self {
            Self::Random => None,
            Self::Sequential { seed, .. } => Some(seed),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}
