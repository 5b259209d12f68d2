// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory provider source for registry tests.
//!
//! Holds a manifest as text plus a table of named factory constructors.
//! Constructors can be made to fail or panic, and the manifest can be made
//! to break off mid-stream, so tests can exercise every isolation path of
//! the scanner.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use scriptor_core::{ProviderSource, ScriptEngineFactory, ScriptorError, SourceId};

use crate::mock_engine::MockEngineFactory;

type LoadResult = Result<Arc<dyn ScriptEngineFactory>, ScriptorError>;
type Constructor = Arc<dyn Fn() -> LoadResult + Send + Sync>;

/// A provider source whose manifest and factories live in memory.
#[derive(Clone)]
pub struct InMemorySource {
    id: SourceId,
    manifest_path: Option<String>,
    manifest: String,
    truncated: bool,
    constructors: HashMap<String, Constructor>,
    loads: Arc<AtomicUsize>,
}

impl InMemorySource {
    /// Create a source with no manifest.
    pub fn new(id: &str) -> Self {
        Self {
            id: SourceId::new(id),
            manifest_path: None,
            manifest: String::new(),
            truncated: false,
            constructors: HashMap::new(),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Place a manifest at `path` listing `lines` verbatim, one per line.
    pub fn with_manifest(mut self, path: &str, lines: &[&str]) -> Self {
        self.manifest_path = Some(path.to_string());
        self.manifest = lines.iter().map(|l| format!("{l}\n")).collect();
        self
    }

    /// Make the manifest fail with an I/O error after its last line.
    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    /// Declare a loadable factory. Every load constructs a fresh instance.
    pub fn with_factory(mut self, name: &str, factory: MockEngineFactory) -> Self {
        let constructor: Constructor = Arc::new(move || -> LoadResult { Ok(factory.clone().shared()) });
        self.constructors.insert(name.to_string(), constructor);
        self
    }

    /// Declare a factory whose construction fails with `message`.
    pub fn with_broken_factory(mut self, name: &str, message: &str) -> Self {
        let factory_name = name.to_string();
        let message = message.to_string();
        let constructor: Constructor = Arc::new(move || -> LoadResult {
            Err(ScriptorError::FactoryConstruction {
                name: factory_name.clone(),
                message: message.clone(),
            })
        });
        self.constructors.insert(name.to_string(), constructor);
        self
    }

    /// Declare a factory whose construction panics.
    pub fn with_panicking_factory(mut self, name: &str) -> Self {
        let factory_name = name.to_string();
        let constructor: Constructor =
            Arc::new(move || -> LoadResult { panic!("constructor of {factory_name} panicked") });
        self.constructors.insert(name.to_string(), constructor);
        self
    }

    /// Wrap the source in the `Arc` the registry expects.
    pub fn shared(self) -> Arc<dyn ProviderSource> {
        Arc::new(self)
    }

    /// Number of factory loads attempted so far, across all clones.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ProviderSource for InMemorySource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    fn has_entry(&self, path: &str) -> bool {
        self.manifest_path.as_deref() == Some(path)
    }

    fn open_entry(&self, path: &str) -> Result<Box<dyn BufRead + Send>, ScriptorError> {
        if !self.has_entry(path) {
            return Err(ScriptorError::ManifestRead {
                source_id: self.id.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, format!("no entry at {path}")),
            });
        }
        let reader = TruncatingReader {
            inner: Cursor::new(self.manifest.clone().into_bytes()),
            fail_at_end: self.truncated,
        };
        Ok(Box::new(BufReader::new(reader)))
    }

    fn load_factory(&self, name: &str) -> Result<Arc<dyn ScriptEngineFactory>, ScriptorError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match self.constructors.get(name) {
            Some(constructor) => constructor(),
            None => Err(ScriptorError::FactoryNotFound {
                source_id: self.id.to_string(),
                name: name.to_string(),
            }),
        }
    }
}

/// Reader that optionally reports an I/O error instead of end-of-file.
struct TruncatingReader {
    inner: Cursor<Vec<u8>>,
    fail_at_end: bool,
}

impl Read for TruncatingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && self.fail_at_end && !buf.is_empty() {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "manifest truncated"));
        }
        Ok(n)
    }
}
