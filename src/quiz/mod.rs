//! Quiz generation: a memoized view of the user's Spotify data, random
//! selection helpers, and the question generators built on top of them.

pub mod choices;
pub mod sections;
pub mod selection;
pub mod user_data;

pub use sections::build_questions;
pub use user_data::UserData;
