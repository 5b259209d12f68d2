// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed provider source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use scriptor_core::{ProviderSource, ScriptEngineFactory, ScriptorError, SourceId};

use crate::catalog::FactoryCatalog;

/// A directory whose manifest names factories from a [`FactoryCatalog`].
///
/// The directory path doubles as the source identity.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    id: SourceId,
    root: PathBuf,
    catalog: Arc<FactoryCatalog>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, catalog: Arc<FactoryCatalog>) -> Self {
        let root = root.into();
        Self {
            id: SourceId::new(root.display().to_string()),
            root,
            catalog,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProviderSource for DirectorySource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    fn has_entry(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }

    fn open_entry(&self, path: &str) -> Result<Box<dyn BufRead + Send>, ScriptorError> {
        let file = File::open(self.root.join(path)).map_err(|e| ScriptorError::ManifestRead {
            source_id: self.id.to_string(),
            source: e,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn load_factory(&self, name: &str) -> Result<Arc<dyn ScriptEngineFactory>, ScriptorError> {
        self.catalog
            .instantiate(name)
            .ok_or_else(|| ScriptorError::FactoryNotFound {
                source_id: self.id.to_string(),
                name: name.to_string(),
            })?
    }
}
