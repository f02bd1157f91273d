use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::ConfigError;

/// Non-empty lists of given and family names.
#[derive(Clone, Debug)]
pub struct NamePool {
    names: Vec<String>,
    surnames: Vec<String>,
}

impl NamePool {
    /// Fails with [`ConfigError::EmptyList`] if either list is empty.
    pub fn new(names: Vec<String>, surnames: Vec<String>) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::EmptyList {
                field: "generator.names",
            });
        }
        if surnames.is_empty() {
            return Err(ConfigError::EmptyList {
                field: "generator.surnames",
            });
        }
        Ok(Self { names, surnames })
    }

    /// Draws a name and a surname independently, with replacement.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> (&str, &str) {
        // Both lists are non-empty by construction.
        let name = self.names.choose(rng).map_or("", String::as_str);
        let surname = self.surnames.choose(rng).map_or("", String::as_str);
        (name, surname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_empty_lists_rejected() {
        assert!(NamePool::new(vec![], vec!["Nowak".into()]).is_err());
        assert!(NamePool::new(vec!["Jan".into()], vec![]).is_err());
    }

    #[test]
    fn test_single_entry_always_drawn() {
        let pool = NamePool::new(vec!["Jan".into()], vec!["Nowak".into()]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..10 {
            assert_eq!(pool.draw(&mut rng), ("Jan", "Nowak"));
        }
    }
}
