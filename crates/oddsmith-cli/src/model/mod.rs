pub mod profile;
pub mod scenario;
pub mod scheduler;
