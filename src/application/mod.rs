// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`gallery`]: Gallery use cases (sign-in, listing, uploads, profile edits)
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer runs application use cases as Iced tasks

pub mod gallery;
pub mod port;

#[cfg(test)]
pub(crate) mod fake;
