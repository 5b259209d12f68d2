// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Scriptor engine registry.

use thiserror::Error;

/// The primary error type returned by the registry seams and core operations.
///
/// None of these are fatal to the host: discovery and construction failures
/// are logged where they are isolated and the affected capability is simply
/// treated as unavailable.
#[derive(Debug, Error)]
pub enum ScriptorError {
    /// A provider source manifest could not be opened or read.
    #[error("cannot read manifest of provider source {source_id}: {source}")]
    ManifestRead {
        source_id: String,
        source: std::io::Error,
    },

    /// A manifest line names a factory the source cannot load.
    #[error("provider source {source_id} has no engine factory named `{name}`")]
    FactoryNotFound { source_id: String, name: String },

    /// A declared factory was found but failed to construct.
    #[error("cannot construct engine factory `{name}`: {message}")]
    FactoryConstruction { name: String, message: String },

    /// A factory failed to create a live engine instance.
    #[error("engine `{engine}` could not be created: {message}")]
    EngineCreation { engine: String, message: String },

    /// A live engine failed while evaluating a script.
    #[error("evaluation failed in engine `{engine}`: {message}")]
    Evaluation { engine: String, message: String },

    /// The execution collaborator failed to run a resolved script.
    #[error("execution of {path} failed: {message}")]
    Execution { path: String, message: String },

    /// A resource was used after it was disposed.
    #[error("{0} has been disposed")]
    Disposed(String),
}
