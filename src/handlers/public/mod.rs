// handlers/public/mod.rs - endpoints that need no session
pub mod applications;
pub mod jobs;
pub mod root;
pub mod session;
