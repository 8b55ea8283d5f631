// src/config/mod.rs

//! Input handling for `ssm-run`.
//!
//! - `model.rs`: raw, all-optional inputs and the validated configs.
//! - `loader.rs`: optional TOML file, layered under CLI/env inputs.
//! - `validate.rs`: required inputs and value checks (`TryFrom`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_cancel_config, load_from_path, load_run_config, resolve_inputs};
pub use model::{CancelConfig, DEFAULT_POLL_INTERVAL_MS, RawInputs, RunConfig};
