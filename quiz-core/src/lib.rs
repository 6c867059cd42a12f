pub mod answer;
pub mod catalog;
pub mod engine;
pub mod leaderboard;
pub mod providers;
pub mod scoring;
pub mod service;
pub mod timer;

// Re-export main components
pub use catalog::*;
pub use engine::*;
pub use leaderboard::*;
pub use providers::*;
pub use scoring::*;
pub use service::*;
pub use timer::*;
