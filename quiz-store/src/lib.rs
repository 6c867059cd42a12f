pub mod candidates;
pub mod identity;
pub mod memory;

pub use candidates::StaticCandidates;
pub use identity::StaticIdentity;
pub use memory::MemoryScoreStore;
