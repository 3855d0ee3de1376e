//! Catalog domain model.
//!
//! # Responsibility
//! - Define canonical category/product records used by core business logic.
//! - Define asset references and pagination/sort value types shared by the
//!   repository and service layers.
//!
//! # Invariants
//! - Categories and products are identified by store-generated integer ids.
//! - `Product::category` is a denormalized category *name*, never an id.

pub mod asset;
pub mod category;
pub mod page;
pub mod product;
