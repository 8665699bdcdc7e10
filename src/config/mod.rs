//! Configuration: model and training settings, YAML run specs, validation

mod cli;
mod loader;
mod schema;
pub mod validate;

pub use cli::{apply_overrides, parse_args, Cli, Command, InfoArgs, OutputFormat, TrainArgs, ValidateArgs};
pub use loader::{load_spec, parse_spec};
pub use schema::{
    DataSpec, DiscriminatorConfig, GanConfig, GeneratorConfig, ProgressiveConfig, ProgressiveTrainConfig, RunSpec,
    TrainConfig, TrainerKind,
};
pub use validate::{validate_spec, ValidationError};
