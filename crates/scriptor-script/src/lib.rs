// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Script resolution for Scriptor.
//!
//! Turns a script path into a [`ResolvedScript`]: the engine registered for
//! the path's extension, the binding contributors that apply to that engine's
//! language, and the shared [`ServiceCache`]. Running the script is left to a
//! [`ScriptExecutor`].

pub mod adapter;
pub mod cache;
pub mod runtime;
pub mod script;

pub use adapter::ScriptAdapterFactory;
pub use cache::ServiceCache;
pub use runtime::ScriptingRuntime;
pub use script::{ExecutionRequest, ResolvedEngine, ResolvedScript, ScriptExecutor};
