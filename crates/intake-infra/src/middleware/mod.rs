//! Shared HTTP middleware for the intake services

pub mod request_id;

pub use request_id::{request_id_middleware, RequestId};
