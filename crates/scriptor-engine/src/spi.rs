// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest scanner for provider sources.
//!
//! A manifest lists one factory name per line. Each name is loaded through
//! the source that declared it. A name that cannot be loaded, or whose
//! constructor panics, is logged and skipped without affecting the others.

use std::any::Any;
use std::collections::BTreeSet;
use std::io::BufRead;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use scriptor_core::{ProviderSource, ScriptEngineFactory, ScriptorError};
use tracing::{debug, error, warn};

/// Receives the factories a scan discovers.
pub trait FactorySink {
    fn register_factory(&mut self, factory: Arc<dyn ScriptEngineFactory>);
}

impl FactorySink for Vec<Arc<dyn ScriptEngineFactory>> {
    fn register_factory(&mut self, factory: Arc<dyn ScriptEngineFactory>) {
        self.push(factory);
    }
}

/// Returns true if `source` carries a manifest at `manifest_path`.
pub fn has_manifest(source: &dyn ProviderSource, manifest_path: &str) -> bool {
    source.has_entry(manifest_path)
}

/// Scan the manifest of `source` and hand every loadable factory to `sink`.
///
/// Returns the union of extensions declared by the registered factories.
/// Lines are trimmed and blank lines skipped. Bytes that are not UTF-8 are
/// replaced, so such a line simply fails to load. A read error part-way
/// through the manifest stops the scan but keeps what was registered before it.
pub fn scan(
    source: &dyn ProviderSource,
    manifest_path: &str,
    sink: &mut dyn FactorySink,
) -> BTreeSet<String> {
    let mut extensions = BTreeSet::new();

    if !has_manifest(source, manifest_path) {
        debug!(source = %source.id(), manifest_path, "provider source has no engine manifest");
        return extensions;
    }

    let mut reader = match source.open_entry(manifest_path) {
        Ok(reader) => reader,
        Err(e) => {
            error!(source = %source.id(), error = %e, "cannot open engine manifest");
            return extensions;
        }
    };

    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!(
                    source = %source.id(),
                    error = %e,
                    "engine manifest read failed, keeping factories found so far"
                );
                break;
            }
        }

        // Invalid UTF-8 only spoils its own line.
        let line = String::from_utf8_lossy(&buf);
        let name = line.trim();
        if name.is_empty() {
            continue;
        }

        match load_isolated(source, name) {
            Ok(factory) => {
                extensions.extend(factory.descriptor().extensions.iter().cloned());
                sink.register_factory(factory);
            }
            Err(e) => {
                error!(source = %source.id(), factory = name, error = %e, "cannot register engine factory");
            }
        }
    }

    extensions
}

/// Load one factory, converting a panicking constructor into an error.
fn load_isolated(
    source: &dyn ProviderSource,
    name: &str,
) -> Result<Arc<dyn ScriptEngineFactory>, ScriptorError> {
    match panic::catch_unwind(AssertUnwindSafe(|| source.load_factory(name))) {
        Ok(result) => result,
        Err(payload) => Err(ScriptorError::FactoryConstruction {
            name: name.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "constructor panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptor_test_utils::{InMemorySource, MockEngineFactory};

    const MANIFEST: &str = "META-INF/engines";

    fn names(factories: &[Arc<dyn ScriptEngineFactory>]) -> Vec<String> {
        factories
            .iter()
            .map(|f| f.descriptor().engine_name.clone())
            .collect()
    }

    #[test]
    fn source_without_manifest_yields_nothing() {
        let source = InMemorySource::new("s");
        let mut found = Vec::new();
        let extensions = scan(&source, MANIFEST, &mut found);
        assert!(found.is_empty());
        assert!(extensions.is_empty());
        assert_eq!(source.load_count(), 0);
    }

    #[test]
    fn lines_are_trimmed_and_blanks_skipped() {
        let source = InMemorySource::new("s")
            .with_manifest(MANIFEST, &["  lua  ", "", "\t", "py"])
            .with_factory("lua", MockEngineFactory::new("lua", &["lua"]))
            .with_factory("py", MockEngineFactory::new("py", &["py", "pyw"]));

        let mut found = Vec::new();
        let extensions = scan(&source, MANIFEST, &mut found);

        assert_eq!(names(&found), vec!["lua", "py"]);
        assert_eq!(
            extensions.into_iter().collect::<Vec<_>>(),
            vec!["lua", "py", "pyw"]
        );
        assert_eq!(source.load_count(), 2);
    }

    #[test]
    fn failing_and_panicking_constructors_are_isolated() {
        let source = InMemorySource::new("s")
            .with_manifest(MANIFEST, &["bad", "boom", "missing", "lua"])
            .with_broken_factory("bad", "no runtime")
            .with_panicking_factory("boom")
            .with_factory("lua", MockEngineFactory::new("lua", &["lua"]));

        let mut found = Vec::new();
        scan(&source, MANIFEST, &mut found);

        assert_eq!(names(&found), vec!["lua"]);
    }

    #[test]
    fn truncated_manifest_keeps_earlier_factories() {
        let source = InMemorySource::new("s")
            .with_manifest(MANIFEST, &["lua", "py"])
            .truncated()
            .with_factory("lua", MockEngineFactory::new("lua", &["lua"]))
            .with_factory("py", MockEngineFactory::new("py", &["py"]));

        let mut found = Vec::new();
        scan(&source, MANIFEST, &mut found);

        assert_eq!(names(&found), vec!["lua", "py"]);
    }

    #[test]
    fn panic_message_extracts_payload_text() {
        let payload: Box<dyn Any + Send> = Box::new("static text");
        assert_eq!(panic_message(payload.as_ref()), "static text");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "constructor panicked");
    }
}
