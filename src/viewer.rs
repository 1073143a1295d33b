use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;

use log::{debug, warn};

use crate::config::Config;

/// Open `document` with the configured viewer, then block until the user
/// presses Enter so the temporary document outlives the viewer.
pub fn preview(config: &Config, document: &Path) -> io::Result<()> {
    match &config.open {
        Some(open) => {
            debug!("{} {}", open.display(), document.display());
            if let Err(err) = Command::new(open).arg(document).status() {
                warn!("Cannot run open utility `{}`: {err}", open.display());
                warn!("Open your file manually to check it");
            }
        }
        None => warn!("No open utility configured, open {} manually", document.display()),
    }

    print!("Press enter to flush all outputs");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
