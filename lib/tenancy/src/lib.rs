//! Subdomain-based tenant resolution for chalkline.
//!
//! One school tenant is selected per request by the leftmost label of the
//! request host. This crate holds the pure derivation and routing rules;
//! the directory lookup itself is an HTTP call made by the server.

pub mod directory;
pub mod subdomain;

pub use directory::{OrgDirectoryEntry, target_subdomain};
pub use subdomain::{FALLBACK_SUBDOMAIN, subdomain_from_host};
