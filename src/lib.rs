//
// lib.rs
// eaglediff
//
// Library entry that re-exports the diff engine so the binary and the integration tests share it:
// page rendering, canvas alignment, change compositing, PDF assembly and library comparison.
//
pub mod canvas;
pub mod cli;
pub mod composite;
pub mod config;
pub mod design;
pub mod diff;
pub mod document;
pub mod error;
pub mod library;
pub mod render;
pub mod semantic;
pub mod text;
pub mod utils;
pub mod viewer;
pub mod visual;

pub use cli::{build_request, load_config, Args};
pub use config::{Config, LayerGroup};
pub use diff::{run_diff, DiffOutcome, DiffRequest, VisualReport};
pub use error::DiffError;
pub use render::{EagleRenderer, PageRenderer};
pub use semantic::{diff_libraries, DiffReport, Finding};
