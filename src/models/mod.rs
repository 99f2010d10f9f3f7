pub mod joke;
pub mod user;

pub use joke::{Joke, NewJoke};
pub use user::{Author, User};
