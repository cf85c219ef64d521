//! CLI command implementations.

pub(crate) mod build;

pub(crate) use build::BuildArgs;
