// handlers/protected/mod.rs - endpoints that require the `token` session cookie
pub mod applications;
