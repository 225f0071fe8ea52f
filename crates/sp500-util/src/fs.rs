use anyhow::Result;
use std::path::Path;
use tracing::{debug, trace};

/// Write `contents` to `path`, creating any missing parent directories.
///
/// ```rust,ignore
/// sp500_util::write_file("./plots/AAPL.svg", svg.as_bytes()).await?;
/// ```
pub async fn write_file(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(dir).await?;
        }
    }

    tokio::fs::write(path, contents).await?;
    debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Reads a UTF-8 text file from `path`.
pub async fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    trace!("reading file at path: \"{}\"", path.display());
    let text = tokio::fs::read_to_string(path).await?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_file_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/plots/AAPL.svg");

        write_file(&path, b"<svg/>").await.unwrap();

        assert_eq!(read_text(&path).await.unwrap(), "<svg/>");
    }

    #[tokio::test]
    async fn write_file_overwrites_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SP500.csv");

        write_file(&path, b"first").await.unwrap();
        write_file(&path, b"second").await.unwrap();

        assert_eq!(read_text(&path).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn read_text_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_text(dir.path().join("missing.csv")).await.is_err());
    }
}
