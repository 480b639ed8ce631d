mod preferences;
mod profile;

pub use preferences::preferences_update;
pub use profile::{profile_get, profile_update, user_delete};
