//! Version resolution over the merged release catalogs
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │  Merge   │──▶│   Sort   │──▶│  Filter  │──▶│  Match   │──▶│   URL    │
//! │(catalogs)│   │(semver ↓)│   │(lts/sec/ │   │ (range)  │   │(download)│
//! └──────────┘   └──────────┘   │ platform)│   └──────────┘   └──────────┘
//!                               └──────────┘
//! ```
//!
//! # Modules
//!
//! - [`resolver`]: `VersionResolver`, the pipeline above
//! - [`tag`]: classification of tags into wildcard, range, and LTS queries
//! - [`range`]: node-semver compatible range parsing and matching
//! - [`platform`]: platform/arch normalisation and the Apple-silicon fallback
//! - [`semver`]: version parsing, coercion, and release ordering
//! - [`types`]: request, result, and download base types

pub mod platform;
pub mod range;
pub mod resolver;
pub mod semver;
pub mod tag;
pub mod types;

pub use resolver::VersionResolver;
pub use types::{DownloadBases, ResolutionRequest, ResolutionResult};
