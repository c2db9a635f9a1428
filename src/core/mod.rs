//! Core domain logic for podfacts
//!
//! This module contains the reconciliation vocabulary and the pure decisions made on it.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Fact, `WorkItem`, `ResourceKey`, `ResourceEvent`)
//! - `services/` - Pure decisions (eligibility, fact selection, annotation copy)
//! - `ports/` - Trait definitions for the cluster and the fact provider

pub mod models;
pub mod ports;
pub mod services;
