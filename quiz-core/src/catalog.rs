use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use rand::Rng;

use quiz_types::{Candidate, CandidateId};

/// Pool size the game fetches by default (first-generation roster).
pub const DEFAULT_POOL_SIZE: usize = 151;

/// External supplier of the guessing pool. Fetch failure blocks game start
/// entirely; the core never retries on its own.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_candidates(&self, limit: usize) -> Result<Vec<Candidate>>;
}

/// The loaded candidate pool. Immutable once loaded; rounds draw from it
/// uniformly at random.
#[derive(Debug, Clone)]
pub struct Catalog {
    pool: Vec<Candidate>,
}

impl Catalog {
    pub fn new(pool: Vec<Candidate>) -> Self {
        Self { pool }
    }

    /// Fetch the pool from a source. An empty pool is as fatal as a failed
    /// fetch: there is nothing to guess.
    pub async fn load(source: &dyn CandidateSource, limit: usize) -> Result<Self> {
        let pool = source
            .fetch_candidates(limit)
            .await
            .context("failed to fetch candidate catalog")?;
        if pool.is_empty() {
            bail!("candidate catalog is empty");
        }
        Ok(Self::new(pool))
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Uniform draw from the pool. Redraws while the result matches
    /// `exclude`. When the pool holds a single candidate, repeats are
    /// permitted rather than looping forever.
    pub fn pick_random(&self, exclude: Option<CandidateId>) -> Option<Candidate> {
        if self.pool.is_empty() {
            return None;
        }
        let mut rng = rand::rng();
        loop {
            let candidate = &self.pool[rng.random_range(0..self.pool.len())];
            if self.pool.len() == 1 || Some(candidate.id) != exclude {
                return Some(candidate.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: CandidateId, name: &str) -> Candidate {
        Candidate {
            id,
            name: name.to_string(),
            image_url: format!("https://sprites.example/{id}.png"),
        }
    }

    fn pool(n: u32) -> Vec<Candidate> {
        (1..=n).map(|i| candidate(i, &format!("mon-{i}"))).collect()
    }

    #[test]
    fn pick_from_empty_pool_is_none() {
        let catalog = Catalog::new(Vec::new());
        assert!(catalog.pick_random(None).is_none());
    }

    #[test]
    fn pick_never_returns_excluded_id_when_pool_allows() {
        let catalog = Catalog::new(pool(5));
        for _ in 0..200 {
            let picked = catalog.pick_random(Some(3)).unwrap();
            assert_ne!(picked.id, 3);
        }
    }

    #[test]
    fn single_candidate_pool_may_repeat() {
        let catalog = Catalog::new(pool(1));
        let picked = catalog.pick_random(Some(1)).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn pick_covers_the_pool() {
        let catalog = Catalog::new(pool(3));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(catalog.pick_random(None).unwrap().id);
        }
        assert_eq!(seen.len(), 3);
    }

    struct FailingSource;

    #[async_trait]
    impl CandidateSource for FailingSource {
        async fn fetch_candidates(&self, _limit: usize) -> Result<Vec<Candidate>> {
            bail!("catalog endpoint unreachable")
        }
    }

    struct EmptySource;

    #[async_trait]
    impl CandidateSource for EmptySource {
        async fn fetch_candidates(&self, _limit: usize) -> Result<Vec<Candidate>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn load_fails_when_source_fails() {
        let result = Catalog::load(&FailingSource, DEFAULT_POOL_SIZE).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn load_fails_on_empty_pool() {
        let result = Catalog::load(&EmptySource, DEFAULT_POOL_SIZE).await;
        assert!(result.unwrap_err().to_string().contains("empty"));
    }
}
