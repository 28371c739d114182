pub mod identity;
pub mod time;
pub mod validation;
