//! sf-project: scenario file format and validation.

use std::fs;
use std::path::Path;

pub mod migrate;
pub mod schema;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Migrate a freshly parsed scenario and check it.
fn accept(parsed: Scenario) -> ProjectResult<Scenario> {
    let scenario = migrate_to_latest(parsed)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

/// Parse, migrate and validate a YAML scenario.
pub fn from_yaml_str(content: &str) -> ProjectResult<Scenario> {
    accept(serde_yaml::from_str(content)?)
}

/// Parse, migrate and validate a JSON scenario.
pub fn from_json_str(content: &str) -> ProjectResult<Scenario> {
    accept(serde_json::from_str(content)?)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Scenario> {
    from_yaml_str(&fs::read_to_string(path)?)
}

pub fn load_json(path: &Path) -> ProjectResult<Scenario> {
    from_json_str(&fs::read_to_string(path)?)
}

/// Validate and write `scenario` as YAML.
pub fn save_yaml(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    fs::write(path, serde_yaml::to_string(scenario)?)?;
    Ok(())
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    fs::write(path, serde_json::to_string_pretty(scenario)?)?;
    Ok(())
}
