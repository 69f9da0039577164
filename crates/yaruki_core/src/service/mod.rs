//! Use-case services over the persistence layer.
//!
//! # Responsibility
//! - Provide stable entry points for presentation callers.
//! - Own the per-day editing session lifecycle.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - The service layer stays storage-agnostic behind repository traits.

pub mod day_service;
