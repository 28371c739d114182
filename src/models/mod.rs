pub mod scenario;
pub mod signal;
pub mod user;
pub mod vacancy;
