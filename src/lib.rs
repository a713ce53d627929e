//! pkglint, a validator for package manifests (`.nuspec` files).

#![warn(missing_docs)]

pub mod cli;
