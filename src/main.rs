use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::debug;

use eaglediff::{build_request, load_config, run_diff, viewer, Args, DiffOutcome, EagleRenderer};

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();
    debug!("Arguments: {args:?}");

    let config = load_config(&args)?;
    let renderer = EagleRenderer::new(&config);
    let request = build_request(&args);

    match run_diff(&request, &config, &renderer)? {
        DiffOutcome::Visual(report) => {
            println!("{} page(s) written to {}", report.pages, report.output.display());
            if report.preview {
                viewer::preview(&config, &report.output)?;
            }
        }
        DiffOutcome::Semantic(report) => print!("{report}"),
        DiffOutcome::Text(diff) => print!("{diff}"),
        DiffOutcome::NoOutput | DiffOutcome::Skipped(_) => {}
    }

    Ok(())
}
