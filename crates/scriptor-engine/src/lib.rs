// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamic script engine registry.
//!
//! Engine factories arrive two ways: provider sources that list factory names
//! in a manifest, and factories registered one at a time. The registry keeps
//! the membership and lazily builds an immutable [`EngineSnapshot`] from it,
//! which every lookup is answered from until membership changes again.

pub mod catalog;
pub mod registry;
pub mod snapshot;
pub mod source;
pub mod spi;

pub use catalog::{FactoryCatalog, FactoryConstructor};
pub use registry::{EngineRegistry, SourceEvent, extension_of};
pub use snapshot::EngineSnapshot;
pub use source::DirectorySource;
pub use spi::{FactorySink, has_manifest, scan};
