pub mod home;
mod layout;
pub mod not_found;
