//! Site bundle preparation
//!
//! An upload is either a zip archive or a single HTML document. Both end up
//! as a directory tree in a per-request scratch directory whose root must
//! hold `index.html`. The scratch directory is removed when the
//! [`PreparedBundle`] is dropped, whatever the outcome of the publish.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};

use sitedrop_provider::FileUpload;
use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{CoreError, CoreResult};
use crate::types::UploadedBundle;

/// Entry file every site needs at its root.
pub const INDEX_FILE: &str = "index.html";

/// Prefix of the scratch directories.
const SCRATCH_PREFIX: &str = "website-";

/// Resource fork folder added by the macOS archiver.
const MACOS_METADATA_DIR: &str = "__MACOSX";

const ZIP_CONTENT_TYPES: &[&str] = &["application/zip", "application/x-zip-compressed"];
const HTML_CONTENT_TYPES: &[&str] = &["text/html"];

/// Size caps applied while preparing a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleLimits {
    /// Bytes of the upload as received
    pub max_upload_bytes: u64,
    /// Total bytes written when expanding an archive
    pub max_extracted_bytes: u64,
}

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleKind {
    Archive,
    Html,
}

impl BundleKind {
    /// Detects the format from the declared content type, then the file extension.
    pub fn detect(bundle: &UploadedBundle) -> CoreResult<Self> {
        let content_type = bundle
            .content_type
            .as_deref()
            .map(|ct| {
                ct.split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase()
            })
            .unwrap_or_default();

        if ZIP_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Ok(Self::Archive);
        }
        if HTML_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Ok(Self::Html);
        }

        let extension = Path::new(&bundle.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("zip") => Ok(Self::Archive),
            Some("html" | "htm") => Ok(Self::Html),
            _ => Err(CoreError::BundleError(format!(
                "Unsupported file '{}', upload a .zip or .html file",
                bundle.file_name
            ))),
        }
    }
}

/// Site files laid out in a scratch directory.
#[derive(Debug)]
pub struct PreparedBundle {
    scratch: TempDir,
    root: PathBuf,
}

impl PreparedBundle {
    /// Validates and expands `bundle` under `scratch_dir`.
    ///
    /// Blocking; run it off the async executor.
    pub fn prepare(
        bundle: &UploadedBundle,
        scratch_dir: &Path,
        limits: BundleLimits,
    ) -> CoreResult<Self> {
        if bundle.data.len() as u64 > limits.max_upload_bytes {
            return Err(CoreError::PayloadTooLarge {
                limit: limits.max_upload_bytes,
            });
        }
        let kind = BundleKind::detect(bundle)?;

        fs::create_dir_all(scratch_dir).map_err(|e| {
            CoreError::StorageError(format!(
                "Failed to create scratch root {}: {e}",
                scratch_dir.display()
            ))
        })?;
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(scratch_dir)
            .map_err(|e| CoreError::StorageError(format!("Failed to create scratch dir: {e}")))?;

        let root = match kind {
            BundleKind::Html => {
                write_file(&scratch.path().join(INDEX_FILE), &bundle.data)?;
                scratch.path().to_path_buf()
            }
            BundleKind::Archive => {
                let (count, bytes) =
                    extract_zip(&bundle.data, scratch.path(), limits.max_extracted_bytes)?;
                log::debug!(
                    "Extracted {count} files ({bytes} bytes) from '{}' into {}",
                    bundle.file_name,
                    scratch.path().display()
                );
                effective_root(scratch.path())?
            }
        };

        if !root.join(INDEX_FILE).is_file() {
            return Err(CoreError::BundleError(format!(
                "File '{INDEX_FILE}' not found at the root of the upload"
            )));
        }

        Ok(Self { scratch, root })
    }

    /// Directory holding `index.html`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scratch directory removed on drop.
    #[must_use]
    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    /// Every file under the root, with forward-slash relative paths, sorted.
    pub fn files(&self) -> CoreResult<Vec<FileUpload>> {
        let mut files = Vec::new();
        collect_files(&self.root, &self.root, &mut files)?;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

/// Expands `data` into `target_dir`, returning the file count and bytes written.
///
/// Declared entry sizes are not trusted: every entry is read through a
/// [`Read::take`] bounded by what is left of `max_bytes`.
fn extract_zip(data: &[u8], target_dir: &Path, max_bytes: u64) -> CoreResult<(u32, u64)> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| CoreError::BundleError(format!("Failed to open zip archive: {e}")))?;

    let mut file_count = 0u32;
    let mut remaining = max_bytes;
    let too_large = || CoreError::PayloadTooLarge { limit: max_bytes };

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| CoreError::BundleError(format!("Failed to read zip entry {i}: {e}")))?;

        // Entries escaping the target directory have no enclosed name.
        let Some(relative) = file.enclosed_name() else {
            log::warn!("Skipping zip entry with unsafe path: {}", file.name());
            continue;
        };
        if is_metadata_entry(&relative) {
            continue;
        }

        let outpath = target_dir.join(&relative);
        if file.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| {
                CoreError::StorageError(format!("Failed to create directory {}: {e}", outpath.display()))
            })?;
            continue;
        }

        if file.size() > remaining {
            log::warn!("Zip entry '{}' expands past {max_bytes} bytes", relative.display());
            return Err(too_large());
        }

        let mut contents = Vec::new();
        file.by_ref()
            .take(remaining.saturating_add(1))
            .read_to_end(&mut contents)
            .map_err(|e| {
                CoreError::BundleError(format!(
                    "Failed to read zip entry '{}': {e}",
                    relative.display()
                ))
            })?;
        let written = contents.len() as u64;
        if written > remaining {
            log::warn!("Zip entry '{}' expands past {max_bytes} bytes", relative.display());
            return Err(too_large());
        }
        remaining -= written;

        write_file(&outpath, &contents)?;
        file_count += 1;
    }

    Ok((file_count, max_bytes - remaining))
}

fn is_metadata_entry(relative: &Path) -> bool {
    matches!(
        relative.components().next(),
        Some(Component::Normal(first)) if first == MACOS_METADATA_DIR
    )
}

/// A lone top-level directory with no sibling files becomes the root.
fn effective_root(dir: &Path) -> CoreResult<PathBuf> {
    let entries = fs::read_dir(dir)
        .map_err(|e| CoreError::StorageError(format!("Failed to read {}: {e}", dir.display())))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CoreError::StorageError(format!("Failed to read {}: {e}", dir.display())))?;

    if let [only] = entries.as_slice() {
        let path = only.path();
        if path.is_dir() {
            log::debug!("Using nested directory {} as site root", path.display());
            return Ok(path);
        }
    }
    Ok(dir.to_path_buf())
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<FileUpload>) -> CoreResult<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| CoreError::StorageError(format!("Failed to read {}: {e}", dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| CoreError::StorageError(format!("Failed to read {}: {e}", dir.display())))?
            .path();

        if path.is_dir() {
            collect_files(root, &path, out)?;
            continue;
        }

        let content = fs::read(&path).map_err(|e| {
            CoreError::StorageError(format!("Failed to read {}: {e}", path.display()))
        })?;
        out.push(FileUpload {
            path: relative_path(root, &path),
            content,
        });
    }
    Ok(())
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn write_file(path: &Path, contents: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::StorageError(format!("Failed to create directory {}: {e}", parent.display()))
        })?;
    }
    fs::write(path, contents)
        .map_err(|e| CoreError::StorageError(format!("Failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::zip_bundle;

    fn html(name: &str, content_type: Option<&str>) -> UploadedBundle {
        UploadedBundle {
            file_name: name.into(),
            content_type: content_type.map(Into::into),
            data: b"<h1>hi</h1>".to_vec(),
        }
    }

    fn limits(max_bytes: u64) -> BundleLimits {
        BundleLimits {
            max_upload_bytes: max_bytes,
            max_extracted_bytes: max_bytes,
        }
    }

    fn paths(bundle: &PreparedBundle) -> Vec<String> {
        bundle.files().unwrap().into_iter().map(|f| f.path).collect()
    }

    #[test]
    fn detects_by_content_type_then_extension() {
        let zip = UploadedBundle {
            file_name: "site".into(),
            content_type: Some("application/x-zip-compressed".into()),
            data: vec![],
        };
        assert_eq!(BundleKind::detect(&zip).unwrap(), BundleKind::Archive);
        assert_eq!(
            BundleKind::detect(&html("page.HTM", Some("application/octet-stream"))).unwrap(),
            BundleKind::Html
        );
        assert_eq!(
            BundleKind::detect(&html("x", Some("text/html; charset=utf-8"))).unwrap(),
            BundleKind::Html
        );
        assert!(matches!(
            BundleKind::detect(&html("notes.txt", Some("text/plain"))),
            Err(CoreError::BundleError(_))
        ));
    }

    #[test]
    fn html_upload_becomes_index() {
        let scratch = tempfile::tempdir().unwrap();
        let bundle =
            PreparedBundle::prepare(&html("landing.html", None), scratch.path(), limits(1024))
                .unwrap();
        let files = bundle.files().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, INDEX_FILE);
        assert_eq!(files[0].content, b"<h1>hi</h1>");
    }

    #[test]
    fn archive_keeps_relative_paths() {
        let scratch = tempfile::tempdir().unwrap();
        let upload = zip_bundle(&[
            ("index.html", "<html></html>"),
            ("css/site.css", "body{}"),
            ("__MACOSX/._index.html", "junk"),
        ]);
        let bundle = PreparedBundle::prepare(&upload, scratch.path(), limits(1 << 20)).unwrap();
        assert_eq!(paths(&bundle), vec!["css/site.css", "index.html"]);
    }

    #[test]
    fn single_directory_is_denested() {
        let scratch = tempfile::tempdir().unwrap();
        let upload = zip_bundle(&[
            ("my-site/index.html", "<html></html>"),
            ("my-site/img/logo.svg", "<svg/>"),
        ]);
        let bundle = PreparedBundle::prepare(&upload, scratch.path(), limits(1 << 20)).unwrap();
        assert!(bundle.root().ends_with("my-site"));
        assert_eq!(paths(&bundle), vec!["img/logo.svg", "index.html"]);
    }

    #[test]
    fn missing_index_names_the_file_and_cleans_up() {
        let scratch = tempfile::tempdir().unwrap();
        let upload = zip_bundle(&[("about.html", "<html></html>")]);
        let err = PreparedBundle::prepare(&upload, scratch.path(), limits(1 << 20)).unwrap_err();
        assert!(err.to_string().contains(INDEX_FILE));
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn scratch_removed_on_drop() {
        let scratch = tempfile::tempdir().unwrap();
        let bundle =
            PreparedBundle::prepare(&html("index.html", None), scratch.path(), limits(1024)).unwrap();
        let path = bundle.scratch_path().to_path_buf();
        assert!(path.exists());
        drop(bundle);
        assert!(!path.exists());
    }

    #[test]
    fn rejects_oversized_upload() {
        let scratch = tempfile::tempdir().unwrap();
        let err = PreparedBundle::prepare(&html("index.html", None), scratch.path(), limits(4))
            .unwrap_err();
        assert!(matches!(err, CoreError::PayloadTooLarge { limit: 4 }));
    }

    #[test]
    fn archive_expanding_past_limit_is_rejected() {
        let scratch = tempfile::tempdir().unwrap();
        let filler = "a".repeat(4 << 20);
        let upload = zip_bundle(&[("index.html", "<html></html>"), ("blob.txt", filler.as_str())]);
        let limits = BundleLimits {
            max_upload_bytes: 1 << 20,
            max_extracted_bytes: 1 << 20,
        };
        assert!((upload.data.len() as u64) < limits.max_upload_bytes);

        let err = PreparedBundle::prepare(&upload, scratch.path(), limits).unwrap_err();
        assert!(matches!(err, CoreError::PayloadTooLarge { limit } if limit == 1 << 20));
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn extraction_limit_covers_all_entries() {
        let scratch = tempfile::tempdir().unwrap();
        let chunk = "b".repeat(300);
        let upload = zip_bundle(&[
            ("index.html", "<html></html>"),
            ("a.txt", chunk.as_str()),
            ("b.txt", chunk.as_str()),
        ]);
        let tight = BundleLimits {
            max_upload_bytes: 1 << 20,
            max_extracted_bytes: 500,
        };
        assert!(matches!(
            PreparedBundle::prepare(&upload, scratch.path(), tight),
            Err(CoreError::PayloadTooLarge { limit: 500 })
        ));

        let roomy = BundleLimits {
            max_extracted_bytes: 1024,
            ..tight
        };
        let bundle = PreparedBundle::prepare(&upload, scratch.path(), roomy).unwrap();
        assert_eq!(paths(&bundle), vec!["a.txt", "b.txt", "index.html"]);
    }

    #[test]
    fn rejects_corrupt_archive() {
        let scratch = tempfile::tempdir().unwrap();
        let upload = UploadedBundle {
            file_name: "site.zip".into(),
            content_type: Some("application/zip".into()),
            data: b"not a zip".to_vec(),
        };
        assert!(matches!(
            PreparedBundle::prepare(&upload, scratch.path(), limits(1024)),
            Err(CoreError::BundleError(_))
        ));
    }
}
