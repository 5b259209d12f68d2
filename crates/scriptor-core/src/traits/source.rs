// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider source trait: a unit of code that may bulk-declare engine factories.

use std::io::BufRead;
use std::sync::Arc;

use crate::error::ScriptorError;
use crate::traits::engine::ScriptEngineFactory;
use crate::types::SourceId;

/// An opaque unit that may declare engine factories through a manifest
/// resource at a fixed, well-known path.
///
/// Manifests list one factory name per line. Names are resolved against the
/// source's own factory space through [`ProviderSource::load_factory`].
pub trait ProviderSource: Send + Sync {
    /// Stable identity of this source.
    fn id(&self) -> &SourceId;

    /// Returns true if the source contains a resource at `path`.
    fn has_entry(&self, path: &str) -> bool;

    /// Opens the resource at `path` for line-oriented reading.
    fn open_entry(&self, path: &str) -> Result<Box<dyn BufRead + Send>, ScriptorError>;

    /// Loads and instantiates the factory declared under `name`.
    fn load_factory(&self, name: &str) -> Result<Arc<dyn ScriptEngineFactory>, ScriptorError>;
}
