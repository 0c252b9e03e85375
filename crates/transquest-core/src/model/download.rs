//! Checkpoint archives: remote fetch and the local cache layout

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, Response};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::info::ModelVariant;

const DRIVE_DOWNLOAD_URL: &str = "https://drive.google.com/uc";

/// Name of the archive written into the model directory before unpacking
pub const ARCHIVE_FILE_NAME: &str = "model.zip";

/// Fetches a zipped checkpoint and unpacks it into a directory
pub trait ArchiveFetcher: Send + Sync {
    fn fetch_and_unpack(&self, archive_id: &str, dest_dir: &Path) -> Result<()>;
}

/// Downloads archives shared through Google Drive
pub struct GoogleDriveFetcher {
    http_client: Client,
    show_progress: bool,
}

impl GoogleDriveFetcher {
    pub fn new() -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(3600))
            .build()
            .map_err(|e| Error::DownloadError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            show_progress: true,
        })
    }

    /// Disable the terminal progress bar (server use)
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn request(&self, archive_id: &str, confirm: bool) -> Result<Response> {
        let mut query = vec![("export", "download"), ("id", archive_id)];
        if confirm {
            query.push(("confirm", "t"));
        }

        debug!("Requesting archive {} (confirm={})", archive_id, confirm);
        let response = self
            .http_client
            .get(DRIVE_DOWNLOAD_URL)
            .query(&query)
            .header("User-Agent", "transquest/0.1.0")
            .send()
            .map_err(|e| Error::DownloadError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} for archive {}",
                response.status(),
                archive_id
            )));
        }
        Ok(response)
    }

    /// Large files get an HTML "can't scan for viruses" page first
    fn is_interstitial(response: &Response) -> bool {
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("text/html"))
            .unwrap_or(false)
    }

    fn download_archive(&self, archive_id: &str, dest: &Path) -> Result<u64> {
        let mut response = self.request(archive_id, false)?;
        if Self::is_interstitial(&response) {
            debug!("Drive returned a confirmation page, retrying with confirm");
            response = self.request(archive_id, true)?;
            if Self::is_interstitial(&response) {
                return Err(Error::DownloadError(format!(
                    "Archive {} is not publicly downloadable",
                    archive_id
                )));
            }
        }

        let pb = if self.show_progress {
            match response.content_length() {
                Some(total) => {
                    let pb = ProgressBar::new(total);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{elapsed_precise}] {bytes}/{total_bytes} {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar()),
                    );
                    pb
                }
                None => ProgressBar::new_spinner(),
            }
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(format!("Downloading {}", archive_id));

        let mut file = BufWriter::new(File::create(dest)?);
        let written = std::io::copy(&mut pb.wrap_read(response), &mut file)?;
        pb.finish_with_message(format!("Downloaded {}", archive_id));

        debug!("Downloaded {} bytes to {:?}", written, dest);
        Ok(written)
    }
}

impl ArchiveFetcher for GoogleDriveFetcher {
    fn fetch_and_unpack(&self, archive_id: &str, dest_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dest_dir)?;
        let archive_path = dest_dir.join(ARCHIVE_FILE_NAME);

        self.download_archive(archive_id, &archive_path)?;
        unpack_archive(&archive_path, dest_dir)?;
        std::fs::remove_file(&archive_path)?;
        Ok(())
    }
}

/// Unpack a zip archive into `dest_dir`
pub fn unpack_archive(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    info!(
        "Unpacking {} entries from {:?} into {:?}",
        archive.len(),
        archive_path,
        dest_dir
    );
    archive.extract(dest_dir)?;
    Ok(())
}

/// Local checkpoint cache: `<cache_dir>/<model_name>/`
pub struct ModelDownloader {
    pub models_dir: PathBuf,
    fetcher: Box<dyn ArchiveFetcher>,
}

impl ModelDownloader {
    pub fn new(models_dir: PathBuf, fetcher: Box<dyn ArchiveFetcher>) -> Self {
        Self {
            models_dir,
            fetcher,
        }
    }

    /// Get the local path for a model variant
    pub fn model_path(&self, variant: ModelVariant) -> PathBuf {
        self.models_dir.join(variant.name())
    }

    /// A model counts as cached when its directory exists and is non-empty
    pub fn is_downloaded(&self, variant: ModelVariant) -> bool {
        std::fs::read_dir(self.model_path(variant))
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Fetch the archive for `variant` unconditionally
    pub fn download(&self, variant: ModelVariant) -> Result<PathBuf> {
        let local_dir = self.model_path(variant);
        info!(
            "Downloading TransQuest model {} and saving it at {:?}",
            variant, local_dir
        );
        self.fetcher
            .fetch_and_unpack(variant.archive_id(), &local_dir)?;
        info!("Model {} downloaded to {:?}", variant, local_dir);
        Ok(local_dir)
    }

    /// Return the cached path, downloading first on a cache miss
    pub fn ensure_downloaded(&self, variant: ModelVariant) -> Result<PathBuf> {
        if self.is_downloaded(variant) {
            debug!("Model {} found in cache", variant);
            return Ok(self.model_path(variant));
        }
        self.download(variant)
    }

    /// Get download size for a model (if cached)
    pub fn get_cached_size(&self, variant: ModelVariant) -> Option<u64> {
        let path = self.model_path(variant);
        if path.exists() {
            Self::dir_size(&path).ok()
        } else {
            None
        }
    }

    /// Calculate directory size recursively
    fn dir_size(path: &Path) -> Result<u64> {
        let mut size = 0;
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                size += metadata.len();
            } else if metadata.is_dir() {
                size += Self::dir_size(&entry.path())?;
            }
        }
        Ok(size)
    }
}
