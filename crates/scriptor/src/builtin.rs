// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engines compiled into the binary.
//!
//! The template engine substitutes `${name}` placeholders with bindings.
//! String bindings are inserted verbatim, other values as JSON. A
//! placeholder without a matching binding is an evaluation error; an
//! unterminated `${` is copied through unchanged.

use std::sync::Arc;

use scriptor_core::{Bindings, EngineDescriptor, ScriptEngine, ScriptEngineFactory, ScriptorError};
use scriptor_engine::FactoryCatalog;

/// Manifest name of the built-in template engine factory.
pub const TEMPLATE_FACTORY: &str = "scriptor.builtin.TemplateEngineFactory";

const TEMPLATE_ENGINE_NAME: &str = "Scriptor Template Engine";

/// Catalog of every built-in factory, for resolving manifest names.
pub fn builtin_catalog() -> FactoryCatalog {
    FactoryCatalog::new().with(TEMPLATE_FACTORY, || {
        Ok(Arc::new(TemplateEngineFactory::new()) as Arc<dyn ScriptEngineFactory>)
    })
}

#[derive(Debug, Clone)]
pub struct TemplateEngineFactory {
    descriptor: EngineDescriptor,
}

impl TemplateEngineFactory {
    pub fn new() -> Self {
        Self {
            descriptor: EngineDescriptor::new(
                TEMPLATE_ENGINE_NAME,
                env!("CARGO_PKG_VERSION"),
                "template",
                "1.0",
            )
            .with_aliases(["tpl"])
            .with_extensions(["tpl", "template"])
            .with_mime_types(["text/x-scriptor-template"]),
        }
    }
}

impl Default for TemplateEngineFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptEngineFactory for TemplateEngineFactory {
    fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    fn create_engine(&self) -> Result<Box<dyn ScriptEngine>, ScriptorError> {
        Ok(Box::new(TemplateEngine))
    }
}

#[derive(Debug)]
struct TemplateEngine;

impl ScriptEngine for TemplateEngine {
    fn engine_name(&self) -> &str {
        TEMPLATE_ENGINE_NAME
    }

    fn eval(&self, source: &str, bindings: &Bindings) -> Result<serde_json::Value, ScriptorError> {
        render(source, bindings).map(serde_json::Value::String)
    }
}

fn render(source: &str, bindings: &Bindings) -> Result<String, ScriptorError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let name = after[..end].trim();
        match bindings.get(name) {
            Some(serde_json::Value::String(s)) => out.push_str(s),
            Some(value) => out.push_str(&value.to_string()),
            None => {
                return Err(ScriptorError::Evaluation {
                    engine: TEMPLATE_ENGINE_NAME.to_string(),
                    message: format!("unbound variable `{name}`"),
                });
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
