//! Common types and utilities for the tsr reflection runtime.
//!
//! This crate provides foundational pieces shared by the reflection crates:
//! - String interning (`Atom`, `Interner`) for type and member names

pub mod interner;

pub use interner::{Atom, Interner};
