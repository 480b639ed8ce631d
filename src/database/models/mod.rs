pub mod history;
pub mod translation;
pub mod user;

pub use history::TranslationHistory;
pub use translation::Translation;
pub use user::{User, UserProfile};
