use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::foundation::error::{WisdomError, WisdomResult};

/// Stream `url` into `dest`, creating parent directories. Returns `dest`.
///
/// A failed transfer removes the partial file.
pub async fn download_to(http: &reqwest::Client, url: &str, dest: &Path) -> WisdomResult<PathBuf> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| WisdomError::fetch(format!("create dir '{}': {e}", parent.display())))?;
    }

    let result = stream_into(http, url, dest).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(dest).await;
    }
    let bytes = result?;
    tracing::debug!(url, bytes, dest = %dest.display(), "download complete");
    Ok(dest.to_path_buf())
}

async fn stream_into(http: &reqwest::Client, url: &str, dest: &Path) -> WisdomResult<u64> {
    let mut response = http
        .get(url)
        .send()
        .await
        .map_err(|e| WisdomError::fetch(format!("download '{url}': {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(WisdomError::fetch(format!("download '{url}' failed ({status})")));
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| WisdomError::fetch(format!("create '{}': {e}", dest.display())))?;
    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| WisdomError::fetch(format!("download '{url}': {e}")))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| WisdomError::fetch(format!("write '{}': {e}", dest.display())))?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| WisdomError::fetch(format!("flush '{}': {e}", dest.display())))?;
    if written == 0 {
        return Err(WisdomError::fetch(format!("download '{url}' was empty")));
    }
    Ok(written)
}
