use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes `bytes` next to `path` first and then swaps the file into place, so a reader never
/// observes a half-written file.
pub fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging_path = staging_path_for(path);
    if let Err(error) = fs::write(&staging_path, bytes) {
        let _ = fs::remove_file(&staging_path);
        return Err(error);
    }
    swap_into_place(&staging_path, path)
}

pub fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    write_bytes_atomic(path, text.as_bytes())
}

/// `rename` replaces an existing target in one step on Unix, so the previous file stays
/// readable until the new one lands. Windows refuses to rename over a file, so the old one has
/// to go first there.
fn swap_into_place(staging_path: &Path, final_path: &Path) -> io::Result<()> {
    #[cfg(windows)]
    match fs::remove_file(final_path) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            let _ = fs::remove_file(staging_path);
            return Err(error);
        }
    }

    fs::rename(staging_path, final_path).inspect_err(|_| {
        let _ = fs::remove_file(staging_path);
    })
}

fn staging_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("save");
    path.with_file_name(format!("{file_name}.tmp"))
}
