use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

/// Combined text from several input files.
#[derive(Debug, Default)]
pub struct Ingested {
    pub text: String,
    pub loaded: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, String)>,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads one text file, refusing anything above `max_bytes`.
pub fn read_source(path: &Path, max_bytes: u64) -> Result<String> {
    let size = fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("exceeds {} byte limit", max_bytes),
        )
        .into());
    }
    Ok(fs::read_to_string(path)?)
}

/// Appends each readable file as `\n\n--- name ---\n<text>`. Unreadable and
/// oversized files are skipped and reported.
pub fn read_sources<P: AsRef<Path>>(paths: &[P], max_bytes: u64) -> Ingested {
    read_sources_with(paths, max_bytes, |_| {})
}

/// Same as [`read_sources`], calling `on_file` after each path is handled.
pub fn read_sources_with<P, F>(paths: &[P], max_bytes: u64, mut on_file: F) -> Ingested
where
    P: AsRef<Path>,
    F: FnMut(&Path),
{
    let mut ingested = Ingested::default();

    for path in paths {
        let path = path.as_ref();
        match read_source(path, max_bytes) {
            Ok(text) => {
                ingested.text.push_str(&format!("\n\n--- {} ---\n{}", display_name(path), text));
                ingested.loaded.push(path.to_path_buf());
            }
            Err(err) => {
                let reason = err.to_string();
                warn!(path = %path.display(), reason = %reason, "skipping input");
                ingested.skipped.push((path.to_path_buf(), reason));
            }
        }
        on_file(path);
    }

    ingested
}
