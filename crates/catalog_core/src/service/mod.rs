//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate category, product and asset stores into use-case APIs.
//! - Keep request adapters decoupled from storage details.
//!
//! # Invariants
//! - Services are the only layer that coordinates more than one store.

pub mod asset_lifecycle;
pub mod category_ref;
pub mod category_service;
pub mod delete_guard;
pub mod error;
pub mod listing;
pub mod product_service;
pub mod rename;
pub mod view;
