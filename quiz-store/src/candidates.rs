use anyhow::Result;
use async_trait::async_trait;

use quiz_core::catalog::CandidateSource;
use quiz_types::{Candidate, CandidateId};

/// Candidate source over a fixed pool.
pub struct StaticCandidates(Vec<Candidate>);

impl StaticCandidates {
    pub fn new(pool: Vec<Candidate>) -> Self {
        Self(pool)
    }

    /// A numbered pool of placeholder candidates.
    pub fn numbered(count: CandidateId) -> Self {
        Self(
            (1..=count)
                .map(|id| Candidate {
                    id,
                    name: format!("mon-{id}"),
                    image_url: format!("https://sprites.example/{id}.png"),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl CandidateSource for StaticCandidates {
    async fn fetch_candidates(&self, limit: usize) -> Result<Vec<Candidate>> {
        Ok(self.0.iter().take(limit).cloned().collect())
    }
}
