// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Executor that reads scripts from the local filesystem.

use std::fs;
use std::sync::Arc;

use scriptor_core::ScriptorError;
use scriptor_script::{ExecutionRequest, ScriptExecutor};
use tracing::debug;

/// Reads the script at the request path and evaluates it with the resolved
/// engine. Script text is kept in the service cache keyed by path.
#[derive(Debug, Default)]
pub struct FileExecutor;

impl ScriptExecutor for FileExecutor {
    fn execute(&self, request: ExecutionRequest<'_>) -> Result<serde_json::Value, ScriptorError> {
        let source = match request.cache.get::<String>(request.path)? {
            Some(cached) => {
                debug!(path = request.path, "script source served from cache");
                cached
            }
            None => {
                let text = fs::read_to_string(request.path).map_err(|e| ScriptorError::Execution {
                    path: request.path.to_string(),
                    message: e.to_string(),
                })?;
                let text = Arc::new(text);
                request.cache.insert(request.path, Arc::clone(&text))?;
                text
            }
        };

        let bindings = request.bindings();
        debug!(
            path = request.path,
            engine = request.engine.engine_name(),
            bindings = bindings.len(),
            "evaluating script"
        );
        request.engine.eval(&source, &bindings)
    }
}
