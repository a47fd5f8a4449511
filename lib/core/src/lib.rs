//! Core domain types and utilities for the chalkline platform.
//!
//! This crate provides the foundational types, error handling, and shared
//! utilities used throughout the chalkline multi-tenant school-management
//! platform.

pub mod error;
pub mod id;

pub use error::{ParseIdError, Result};
pub use id::{OrgId, StudentId, UserId};
