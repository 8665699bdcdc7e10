//! Info command implementation

use super::validate::{format_data_info, format_model_info, format_training_info};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{parse_spec, InfoArgs, OutputFormat};
use std::fs;

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let text = fs::read_to_string(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let spec = parse_spec(&text).map_err(|e| format!("Config error: {e}"))?;

    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "Configuration Info:");
            println!();
            println!("{}", format_model_info(&spec));
            println!("{}", format_data_info(&spec));
            println!("{}", format_training_info(&spec));
            if let Some(history) = &spec.history {
                println!("  History: {}", history.display());
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&spec).map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&spec).map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}
