pub mod figure;
pub mod print;
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Interactive figure viewer
    #[default]
    Terminal,
    /// Render every figure as text to stdout
    Print,
}
