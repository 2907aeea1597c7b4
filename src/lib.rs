//! stencil — turn unstructured text into structured AI prompts.
//!
//! The core is the prompt resolution pipeline: validate the two-token
//! command (directive + layer) against profile-configured patterns, resolve
//! a template file through an ordered fallback chain, and substitute
//! standard and user-supplied variables into it. Everything else — CLI,
//! profile config, I/O adapters, logging — is orchestration around that
//! pipeline.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod loader;
pub mod logging;
pub mod pattern;
pub mod selector;
pub mod substitute;
pub mod vars;
pub mod writer;
