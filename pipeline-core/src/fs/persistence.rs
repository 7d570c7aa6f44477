use std::io::{self, Write};
use std::path::Path;

/// Writes bytes to a file atomically.
///
/// The content goes to a temporary sibling first and is renamed over the
/// target once synced, so readers see either the old or the new object. The
/// whole sequence runs as one blocking task: dropping the returned future
/// does not stop it partway.
///
/// # Arguments
///
/// * `path` - The target file path.
/// * `bytes` - The full new content.
///
/// # Returns
///
/// * `Ok(())` on success.
/// * `Err` on IO failure; the target is not modified.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let path = path.to_path_buf();
    let bytes = bytes.to_vec();
    tokio::task::spawn_blocking(move || write_atomic_blocking(&path, &bytes))
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
}

fn write_atomic_blocking(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let result = std::fs::File::create(temp_path).and_then(|mut temp_file| {
        temp_file.write_all(bytes)?;
        temp_file.sync_all()?;
        std::fs::rename(temp_path, path)
    });

    if result.is_err() {
        let _ = std::fs::remove_file(temp_path);
    }
    result
}

/// Reads a whole file.
///
/// # Returns
///
/// * `Ok(bytes)` on success.
/// * `Err` with `ErrorKind::NotFound` if the file does not exist.
pub async fn read_bytes(path: &Path) -> io::Result<Vec<u8>> {
    tokio::fs::read(path).await
}
