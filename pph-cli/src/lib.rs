pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
pub mod request;

pub use cli::{CalculateArgs, Cli, Command};
pub use commands::{build_input, execute};
pub use request::{CalculationRequest, RequestError};
