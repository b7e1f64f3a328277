//! Writes generated images to the output directory

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::ImageGenError;
use crate::types::OutputFormat;

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LEN: usize = 8;

/// Save images under `dir`, returning absolute paths in input order
///
/// Files are named `{prefix}_{id}.{ext}`, with a `_{n}` suffix when more than
/// one image is written. Every file gets its own id. The directory is created if needed. A failure part
/// way through leaves the files already written in place.
pub async fn save(
    images: &[Vec<u8>],
    dir: &Path,
    prefix: &str,
    format: OutputFormat,
) -> Result<Vec<PathBuf>, ImageGenError> {
    tokio::fs::create_dir_all(dir).await.map_err(ImageGenError::Storage)?;

    let mut paths = Vec::with_capacity(images.len());

    for (index, bytes) in images.iter().enumerate() {
        let id = random_id();
        let name = if images.len() > 1 {
            format!("{prefix}_{id}_{}.{}", index + 1, format.extension())
        } else {
            format!("{prefix}_{id}.{}", format.extension())
        };

        let path = std::path::absolute(dir.join(name)).map_err(ImageGenError::Storage)?;
        tokio::fs::write(&path, bytes).await.map_err(ImageGenError::Storage)?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "saved image");
        paths.push(path);
    }

    Ok(paths)
}

/// Eight lowercase alphanumerics
pub(crate) fn random_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}
