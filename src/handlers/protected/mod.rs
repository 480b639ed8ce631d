// Protected handlers (JWT authentication + active account required)

pub mod translation;
pub mod user;
