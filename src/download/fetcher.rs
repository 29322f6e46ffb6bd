//! Resolution and retrieval of one discovered resource.
//!
//! Given a [`DownloadTask`], the [`Downloader`] extracts the encoded name,
//! service id and extension from the resource URL, resolves the true asset
//! URL on the service's audio endpoint, decodes the mirrored directory
//! path, and streams the asset to disk.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::client::HttpClient;
use super::error::DownloadError;
use super::task::{DownloadTask, ResourceType};
use crate::codec::decode_path;

/// Trailing shape of an audio resource link: `/{name},{id}.{ext}(audio)`.
const AUDIO_LINK_PATTERN: &str = r"^.*/(?P<name>.+),(?P<id>.+)\.(?P<ext>.+)\(audio\)$";

#[allow(clippy::expect_used)]
fn audio_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(AUDIO_LINK_PATTERN).expect("static pattern is valid"))
}

/// Resolved transfer plan for one audio task: where to fetch from and
/// where to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTarget {
    /// True transfer URL on the service's asset endpoint.
    pub asset_url: String,
    /// Destination directory mirroring the remote hierarchy.
    pub dest_dir: PathBuf,
    /// Final file path: decoded name plus the original extension.
    pub dest_file: PathBuf,
}

impl AudioTarget {
    /// Computes the transfer plan for an audio task without touching the
    /// network or the filesystem.
    ///
    /// The asset endpoint lives at the origin of the resource URL:
    /// `{origin}/Audio.ashx?id={id}&type=2&tp=mp3`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Pattern`] if the resource URL does not
    /// match the audio link shape and [`DownloadError::Decode`] if the
    /// name or path segment fails to decode.
    pub fn from_task(task: &DownloadTask) -> Result<Self, DownloadError> {
        let url = task.resource_url.as_str();
        let captures = audio_link_regex()
            .captures(url)
            .ok_or_else(|| DownloadError::pattern(url))?;
        let encoded_name = captures
            .name("name")
            .ok_or_else(|| DownloadError::pattern(url))?
            .as_str();
        let id = captures
            .name("id")
            .ok_or_else(|| DownloadError::pattern(url))?
            .as_str();
        let ext = captures
            .name("ext")
            .ok_or_else(|| DownloadError::pattern(url))?
            .as_str();

        let parsed = Url::parse(url).map_err(|_| DownloadError::pattern(url))?;
        let origin = parsed.origin().ascii_serialization();
        let asset_url = format!("{origin}/Audio.ashx?id={id}&type=2&tp=mp3");

        let name = decode_path(encoded_name).map_err(|source| DownloadError::decode(url, source))?;
        let file_name = format!("{name}.{ext}");

        // Path of the resource relative to the crawl root, decoded, minus
        // the resource's own trailing segment. A resource discovered outside
        // the root (which the service's nested layout never produces) falls
        // back to the mirror root.
        let encoded_rel = url.strip_prefix(task.remote_root.as_str()).unwrap_or_else(|| {
            warn!(url, remote_root = %task.remote_root, "resource outside crawl root");
            ""
        });
        let decoded_rel =
            decode_path(encoded_rel).map_err(|source| DownloadError::decode(url, source))?;
        let sub_dir = decoded_rel
            .rsplit_once('/')
            .map_or("", |(dir, _)| dir)
            .trim_start_matches('/');

        let dest_dir = task.local_root.join(sub_dir);
        let dest_file = dest_dir.join(&file_name);
        Ok(Self {
            asset_url,
            dest_dir,
            dest_file,
        })
    }
}

/// Resolves and retrieves resources, one task at a time.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: HttpClient,
}

impl Downloader {
    /// Creates a downloader over the shared HTTP client.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Resolves and retrieves one task, returning the written file path.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] for any of the task's failure
    /// conditions: unexpected URL shape, decode failure, directory
    /// creation, transfer, or file write. The worker loop logs and absorbs
    /// the error; nothing propagates past one task.
    #[instrument(level = "debug", skip(self, task), fields(url = %task.resource_url))]
    pub async fn fetch(&self, task: &DownloadTask) -> Result<PathBuf, DownloadError> {
        match task.resource_type {
            ResourceType::Audio => self.fetch_audio(task).await,
        }
    }

    async fn fetch_audio(&self, task: &DownloadTask) -> Result<PathBuf, DownloadError> {
        let target = AudioTarget::from_task(task)?;
        info!(
            file = %target.dest_file.display(),
            asset = %target.asset_url,
            "downloading"
        );

        // Idempotent: a pre-existing directory is not an error, and workers
        // may race to create the same ancestors.
        tokio::fs::create_dir_all(&target.dest_dir)
            .await
            .map_err(|source| DownloadError::io(&target.dest_dir, source))?;

        let bytes = self
            .client
            .download_to_file(&target.asset_url, &target.dest_file)
            .await?;
        debug!(bytes, "transfer finished");
        info!(file = %target.dest_file.display(), "downloaded");
        Ok(target.dest_file)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use super::*;

    fn audio_task(resource_url: &str, remote_root: &str) -> DownloadTask {
        DownloadTask {
            resource_url: resource_url.to_string(),
            local_root: PathBuf::from("/mirror"),
            remote_root: remote_root.to_string(),
            resource_type: ResourceType::Audio,
        }
    }

    #[test]
    fn test_target_for_resource_at_crawl_root() {
        let task = audio_task(
            "http://example/dir1/Song+Name,12345.mp3(audio)",
            "http://example/dir1",
        );
        let target = AudioTarget::from_task(&task).unwrap();

        assert_eq!(
            target.asset_url,
            "http://example/Audio.ashx?id=12345&type=2&tp=mp3"
        );
        assert_eq!(target.dest_dir, Path::new("/mirror"));
        assert_eq!(target.dest_file, Path::new("/mirror/Song Name.mp3"));
    }

    #[test]
    fn test_target_mirrors_nested_directories() {
        let task = audio_task(
            "http://example/dir1/Some+Album/B:Side,77.mp3(audio)",
            "http://example/dir1",
        );
        let target = AudioTarget::from_task(&task).unwrap();

        assert_eq!(target.dest_dir, Path::new("/mirror/Some Album"));
        assert_eq!(target.dest_file, Path::new("/mirror/Some Album/B-Side.mp3"));
        assert_eq!(
            target.asset_url,
            "http://example/Audio.ashx?id=77&type=2&tp=mp3"
        );
    }

    #[test]
    fn test_target_decodes_escapes_in_name() {
        // 0xC5 0xBC is U+017C in UTF-8
        let task = audio_task(
            "http://example/d/*c5*bcal,9.mp3(audio)",
            "http://example/d",
        );
        let target = AudioTarget::from_task(&task).unwrap();
        assert_eq!(target.dest_file, Path::new("/mirror/\u{17c}al.mp3"));
    }

    #[test]
    fn test_target_rejects_non_audio_url() {
        let task = audio_task("http://example/dir1/readme.txt", "http://example/dir1");
        assert!(matches!(
            AudioTarget::from_task(&task),
            Err(DownloadError::Pattern { .. })
        ));
    }

    #[test]
    fn test_target_surfaces_decode_failure() {
        // Trailing `*` in the name segment is a malformed encoded path
        let task = audio_task(
            "http://example/dir1/bad*,1.mp3(audio)",
            "http://example/dir1",
        );
        assert!(matches!(
            AudioTarget::from_task(&task),
            Err(DownloadError::Decode { .. })
        ));
    }

    #[test]
    fn test_asset_endpoint_follows_resource_origin() {
        let task = audio_task(
            "http://127.0.0.1:8080/dir/Track,5.mp3(audio)",
            "http://127.0.0.1:8080/dir",
        );
        let target = AudioTarget::from_task(&task).unwrap();
        assert_eq!(
            target.asset_url,
            "http://127.0.0.1:8080/Audio.ashx?id=5&type=2&tp=mp3"
        );
    }
}
