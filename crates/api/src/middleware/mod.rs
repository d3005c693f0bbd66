//! Request extractors for authentication and role checks.

pub mod auth;
