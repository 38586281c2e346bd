use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use crate::error::{InspectError, Result};

/// Print one rendered text block to stdout.
pub fn write_text(repr: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(repr.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|err| InspectError::OutputWrite {
            path: "<stdout>".to_string(),
            source: err,
        })
}

/// File name a source's HTML report is written to: base name with the
/// original extension replaced by `.html`.
pub fn html_file_name(source: &str) -> String {
    let base = Path::new(source)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("dataset");
    format!("{base}.html")
}

/// Write an HTML report for `source` into `dir`. An existing report with the
/// same name is truncated and overwritten, so re-running refreshes it.
pub fn write_html_file(dir: &Path, source: &str, repr: &str) -> Result<PathBuf> {
    let path = dir.join(html_file_name(source));
    fs::write(&path, repr).map_err(|err| InspectError::OutputWrite {
        path: path.display().to_string(),
        source: err,
    })?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_file_name_replaces_extension() {
        assert_eq!(html_file_name("data/tas.nc"), "tas.html");
        assert_eq!(html_file_name("precip.zarr"), "precip.html");
        assert_eq!(html_file_name("plain"), "plain.html");
        assert_eq!(html_file_name("https://host/dap/tas.nc"), "tas.html");
    }

    #[test]
    fn test_second_write_overwrites_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_html_file(dir.path(), "tas.nc", "<p>one</p>").unwrap();
        let second = write_html_file(dir.path(), "tas.nc", "<p>two</p>").unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second).unwrap(), "<p>two</p>");
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let result = write_html_file(&missing, "tas.nc", "<p></p>");
        assert!(matches!(result, Err(InspectError::OutputWrite { .. })));
    }
}
