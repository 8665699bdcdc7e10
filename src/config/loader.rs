//! Reading run specifications

use super::schema::RunSpec;
use super::validate::validate_spec;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Parse a YAML run spec without validating it
pub fn parse_spec(yaml: &str) -> Result<RunSpec> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Read and validate a YAML run spec
pub fn load_spec(path: &Path) -> Result<RunSpec> {
    let spec = parse_spec(&fs::read_to_string(path)?)?;
    validate_spec(&spec)?;
    Ok(spec)
}
