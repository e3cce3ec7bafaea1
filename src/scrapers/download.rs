//! PDF download for registry papers.
//!
//! A download only touches `offline`/`local_path` of its paper, and only once
//! the file is fully on disk. The network transfer runs without the store
//! lock held.

use crate::db::schema::Paper;
use crate::db::store::SharedStore;
use crate::error::{GraphError, GraphResult};
use crate::logger;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Where a paper's PDF is stored inside `papers_dir`.
pub fn local_pdf_path(papers_dir: &Path, paper_id: &str) -> PathBuf {
    papers_dir.join(format!("{}.pdf", paper_id.replace('/', "_")))
}

/// Download the paper's PDF into `papers_dir` and mark it offline.
///
/// Fails with `PaperNotFound` for an unknown id, and with `DownloadFailure`
/// when the paper has no link or the transfer or write fails; in that case the
/// paper stays online. If the paper is removed while the transfer runs, the
/// downloaded file is deleted again and `PaperNotFound` is returned.
pub async fn download_paper(
    client: &Client,
    store: &SharedStore,
    paper_id: &str,
    papers_dir: &Path,
    user_agent: &str,
) -> GraphResult<Paper> {
    let url = {
        let guard = store.lock().await;
        let paper = guard
            .paper(paper_id)
            .ok_or_else(|| GraphError::PaperNotFound(paper_id.to_string()))?;
        paper.url.clone().ok_or_else(|| failure(paper_id, "paper has no pdf link"))?
    };

    let target = local_pdf_path(papers_dir, paper_id);
    logger::info(&format!("Downloading paper {} from {}", paper_id, url));

    let bytes = fetch_to_file(client, &url, user_agent, &target)
        .await
        .map_err(|reason| {
            logger::error(&format!("Download of paper {} failed: {}", paper_id, reason));
            failure(paper_id, &reason)
        })?;

    let local_path = target.to_string_lossy().to_string();
    let mut guard = store.lock().await;
    if let Err(e) = guard.mark_offline(paper_id, &local_path) {
        // The paper was removed while the transfer ran.
        drop(guard);
        logger::warn(&format!(
            "Paper {} disappeared during download; removing {}",
            paper_id, local_path
        ));
        let _ = fs::remove_file(&target).await;
        return Err(e);
    }
    logger::info(&format!(
        "Download completed for paper {} ({} bytes) -> {}",
        paper_id, bytes, local_path
    ));
    guard
        .paper(paper_id)
        .cloned()
        .ok_or_else(|| GraphError::PaperNotFound(paper_id.to_string()))
}

// Streams the body into `<target>.part` and renames it into place on success.
async fn fetch_to_file(
    client: &Client,
    url: &str,
    user_agent: &str,
    target: &Path,
) -> Result<u64, String> {
    let mut resp = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| e.to_string())?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await.map_err(|e| e.to_string())?;
    }
    let partial = target.with_extension("pdf.part");
    let mut file = fs::File::create(&partial).await.map_err(|e| e.to_string())?;

    let mut written = 0u64;
    let result: Result<(), String> = async {
        while let Some(chunk) = resp.chunk().await.map_err(|e| e.to_string())? {
            file.write_all(&chunk).await.map_err(|e| e.to_string())?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| e.to_string())?;
        Ok(())
    }
    .await;

    drop(file);
    if let Err(reason) = result {
        let _ = fs::remove_file(&partial).await;
        return Err(reason);
    }
    fs::rename(&partial, target).await.map_err(|e| e.to_string())?;
    Ok(written)
}

fn failure(paper_id: &str, reason: &str) -> GraphError {
    GraphError::DownloadFailure {
        paper_id: paper_id.to_string(),
        reason: reason.to_string(),
    }
}
