//! chalkline web server.
//!
//! This crate provides the axum-based web service for the chalkline
//! multi-tenant school-management platform: the public per-tenant site,
//! the authentication flows, and the role-routed dashboards.

pub mod auth;
pub mod config;
pub mod content;
pub mod http;
pub mod pages;
pub mod tenancy;
pub mod types;
