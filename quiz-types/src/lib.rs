pub mod errors;
pub mod game;
pub mod score;
pub mod user;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use score::*;
pub use user::*;
