use std::path::Path;

use anyhow::Result;

use crate::output;
use crate::reader;
use crate::render::{self, RenderMode};
use crate::resolve::resolve_sources;

/// Inspect every source in resolver order, isolating failures per source.
/// Returns the number of sources that failed; callers fold that into the
/// process exit status after the whole batch has been attempted.
pub fn handle_inspect(inputs: &[String], mode: RenderMode) -> Result<usize> {
    let sources = resolve_sources(inputs)?;

    let mut failures = 0;
    for source in &sources {
        if let Err(err) = inspect_source(source, mode) {
            failures += 1;
            eprintln!("ncmeta: {err:#}");
        }
    }
    Ok(failures)
}

fn inspect_source(source: &str, mode: RenderMode) -> Result<()> {
    let summary = reader::open_summary(source)?;
    let repr = render::render(&summary, mode);
    match mode {
        RenderMode::Text => {
            output::write_text(&repr)?;
            println!();
        }
        RenderMode::Html => {
            let path = output::write_html_file(Path::new("."), source, &repr)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
