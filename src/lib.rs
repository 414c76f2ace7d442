// Library interface: the installer engine plus the CLI commands built on it

#![allow(clippy::enum_variant_names)] // Error types have Error suffix intentionally

pub mod cli;
pub mod error;
pub mod i18n;
pub mod packages;
pub mod project;
pub mod utils;
