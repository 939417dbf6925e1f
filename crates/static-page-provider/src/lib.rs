//! static-page-provider - Component provider for static page deployments
//!
//! This crate provides the StaticPage component (a public static website
//! composed from five bucket-storage declarations) and the host serve loop
//! that exposes it to an external orchestration engine.

pub mod context;
pub mod host;
pub mod registry;
pub mod static_page;
