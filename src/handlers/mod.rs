// handlers/mod.rs - HTTP handlers
//
// Public: GET /, GET /health, GET /jokes, GET /random-joke
// Protected (API key): POST /jokes, gated by middleware::require_api_key

pub mod health;
pub mod jokes;

pub use health::{health, root};
pub use jokes::{create_jokes, list_jokes, random_joke};
