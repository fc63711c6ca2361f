//! Pairs label maps with their images on disk.
//!
//! Expected layout:
//!
//! ```text
//! root/
//!   train/image/a.jpg   train/label/a.png
//!   val/image/...       val/label/...
//!   test/image/...      test/label/...
//! ```
//!
//! Indexing is best-effort: unpaired files and missing directories are
//! reported through the [`Reporter`] and skipped, never returned as errors.

mod sample;

pub use sample::{Sample, SampleLoader};

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::SeguiError;
use crate::report::{Issue, IssueCode, IssueContext, Reporter};

/// Extensions tried first, in order, when looking up a label's image.
pub const PRIMARY_IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "PNG", "JPG", "JPEG"];

/// Every recognised image extension.
pub const IMAGE_EXTENSIONS: [&str; 10] = [
    "jpg", "JPG", "jpeg", "JPEG", "png", "PNG", "ppm", "PPM", "bmp", "BMP",
];

const IMAGE_DIR: &str = "image";
const LABEL_DIR: &str = "label";
const TRAIN_SPLIT: &str = "train";
const VAL_SPLIT: &str = "val";

/// One image paired with its label map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SampleRecord {
    pub image_path: PathBuf,
    pub label_path: PathBuf,
    /// The split directory the pair was found in.
    pub split: String,
}

/// Indexing behaviour.
#[derive(Clone, Debug, Default)]
pub struct IndexOptions {
    /// When indexing `train`, also append every resolvable `val` pair.
    pub include_val: bool,
    /// Drop pairs whose image and label sizes differ.
    pub verify_dimensions: bool,
}

/// Indexes `root/<split>` and returns the resolvable pairs.
///
/// Order is label-file name order, followed by the merged `val` pairs when
/// [`IndexOptions::include_val`] applies.
pub fn index<R: Reporter + ?Sized>(
    root: &Path,
    split: &str,
    options: &IndexOptions,
    reporter: &mut R,
) -> Vec<SampleRecord> {
    let mut records = index_split(root, split, options, false, reporter);

    if split == TRAIN_SPLIT && options.include_val {
        let merged = index_split(root, VAL_SPLIT, options, true, reporter);
        reporter.report(Issue::info(
            IssueCode::IndexSummary,
            format!("merged {} sample(s) from '{}'", merged.len(), VAL_SPLIT),
            IssueContext::split(split),
        ));
        records.extend(merged);
    }

    records
}

/// Finds the image that belongs to `label_path` inside `image_dir`.
///
/// Tries [`PRIMARY_IMAGE_EXTENSIONS`] in order, then accepts a match among
/// [`IMAGE_EXTENSIONS`] only if exactly one exists.
pub fn resolve_image(image_dir: &Path, label_path: &Path) -> Result<PathBuf, SeguiError> {
    match lookup_image(image_dir, label_path) {
        Lookup::Found(path) => Ok(path),
        Lookup::Missing => Err(SeguiError::MissingPair {
            path: label_path.to_path_buf(),
            message: format!("no image with the same name in {}", image_dir.display()),
        }),
        Lookup::Ambiguous(candidates) => Err(SeguiError::MissingPair {
            path: label_path.to_path_buf(),
            message: format!("ambiguous image candidates: {}", join_paths(&candidates)),
        }),
    }
}

enum Lookup {
    Found(PathBuf),
    Missing,
    Ambiguous(Vec<PathBuf>),
}

fn lookup_image(image_dir: &Path, label_path: &Path) -> Lookup {
    let Some(stem) = label_path.file_stem() else {
        return Lookup::Missing;
    };

    for ext in PRIMARY_IMAGE_EXTENSIONS {
        let candidate = image_dir.join(with_extension(stem, ext));
        if candidate.is_file() {
            return Lookup::Found(candidate);
        }
    }

    let mut candidates: Vec<PathBuf> = IMAGE_EXTENSIONS
        .iter()
        .map(|ext| image_dir.join(with_extension(stem, ext)))
        .filter(|candidate| candidate.is_file())
        .collect();

    match candidates.len() {
        0 => Lookup::Missing,
        1 => Lookup::Found(candidates.remove(0)),
        _ => Lookup::Ambiguous(candidates),
    }
}

fn index_split<R: Reporter + ?Sized>(
    root: &Path,
    split: &str,
    options: &IndexOptions,
    merged: bool,
    reporter: &mut R,
) -> Vec<SampleRecord> {
    let image_dir = root.join(split).join(IMAGE_DIR);
    let label_dir = root.join(split).join(LABEL_DIR);

    for dir in [&image_dir, &label_dir] {
        if !dir.is_dir() {
            let message = format!("directory does not exist: {}", dir.display());
            let issue = if merged {
                Issue::warning(IssueCode::MissingDirectory, message, IssueContext::split(split))
            } else {
                Issue::error(IssueCode::MissingDirectory, message, IssueContext::split(split))
            };
            reporter.report(issue);
            return Vec::new();
        }
    }

    let Some(label_files) = list_files(&label_dir, split, reporter) else {
        return Vec::new();
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut label_stems: HashSet<OsString> = HashSet::new();

    for label_path in label_files {
        if let Some(stem) = label_path.file_stem() {
            label_stems.insert(stem.to_os_string());
        }

        let image_path = match lookup_image(&image_dir, &label_path) {
            Lookup::Found(path) => path,
            Lookup::Missing => {
                reporter.report(Issue::warning(
                    IssueCode::MissingImage,
                    "image file not found for label",
                    IssueContext::file(&label_path),
                ));
                skipped += 1;
                continue;
            }
            Lookup::Ambiguous(candidates) => {
                reporter.report(Issue::warning(
                    IssueCode::AmbiguousImage,
                    format!("more than one image matches: {}", join_paths(&candidates)),
                    IssueContext::file(&label_path),
                ));
                skipped += 1;
                continue;
            }
        };

        if options.verify_dimensions && !dimensions_agree(&image_path, &label_path, reporter) {
            skipped += 1;
            continue;
        }

        records.push(SampleRecord {
            image_path,
            label_path,
            split: split.to_string(),
        });
    }

    if let Some(image_files) = list_files(&image_dir, split, reporter) {
        for image_path in image_files {
            let recognised = image_path
                .extension()
                .and_then(OsStr::to_str)
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext));
            let paired = image_path
                .file_stem()
                .is_some_and(|stem| label_stems.contains(stem));
            if recognised && !paired {
                reporter.report(Issue::warning(
                    IssueCode::MissingLabel,
                    "label file not found for image",
                    IssueContext::file(&image_path),
                ));
                skipped += 1;
            }
        }
    }

    tracing::debug!(split, found = records.len(), skipped, "indexed split");
    reporter.report(Issue::info(
        IssueCode::IndexSummary,
        format!("found {} sample(s), skipped {}", records.len(), skipped),
        IssueContext::split(split),
    ));

    records
}

fn dimensions_agree<R: Reporter + ?Sized>(
    image_path: &Path,
    label_path: &Path,
    reporter: &mut R,
) -> bool {
    let mut probe = |path: &Path| match imagesize::size(path) {
        Ok(size) => Some((size.width, size.height)),
        Err(source) => {
            reporter.report(Issue::warning(
                IssueCode::UnreadableDimensions,
                format!("could not read image size: {}", source),
                IssueContext::file(path),
            ));
            None
        }
    };

    let (Some(image_size), Some(label_size)) = (probe(image_path), probe(label_path)) else {
        return false;
    };

    if image_size != label_size {
        reporter.report(Issue::warning(
            IssueCode::DimensionMismatch,
            format!(
                "image is {}x{} but label {} is {}x{}",
                image_size.0,
                image_size.1,
                label_path.display(),
                label_size.0,
                label_size.1
            ),
            IssueContext::file(image_path),
        ));
        return false;
    }
    true
}

/// Regular, non-hidden files directly inside `dir`, sorted by name.
fn list_files<R: Reporter + ?Sized>(
    dir: &Path,
    split: &str,
    reporter: &mut R,
) -> Option<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                reporter.report(Issue::error(
                    IssueCode::MissingDirectory,
                    format!("failed while traversing {}: {}", dir.display(), source),
                    IssueContext::split(split),
                ));
                return None;
            }
        };

        let hidden = entry.file_name().to_str().is_some_and(|n| n.starts_with('.'));
        if entry.file_type().is_file() && !hidden {
            files.push(entry.into_path());
        }
    }

    Some(files)
}

/// Appends `.ext` to a file stem without touching dots already in it.
pub(crate) fn with_extension(stem: &OsStr, ext: &str) -> OsString {
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(ext);
    name
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, b"dummy").expect("write file");
    }

    #[test]
    fn lookup_prefers_primary_extension_order() {
        let temp = tempfile::tempdir().expect("create temp dir");
        touch(&temp.path().join("image/shot.jpg"));
        touch(&temp.path().join("image/shot.png"));

        let found = resolve_image(&temp.path().join("image"), Path::new("label/shot.png"))
            .expect("resolve");
        assert!(found.ends_with("shot.png"));
    }

    #[test]
    fn lookup_falls_back_to_single_other_extension() {
        let temp = tempfile::tempdir().expect("create temp dir");
        touch(&temp.path().join("image/shot.bmp"));

        let found = resolve_image(&temp.path().join("image"), Path::new("label/shot.png"))
            .expect("resolve");
        assert!(found.ends_with("shot.bmp"));
    }

    #[test]
    fn lookup_rejects_ambiguous_fallback() {
        let temp = tempfile::tempdir().expect("create temp dir");
        touch(&temp.path().join("image/shot.bmp"));
        touch(&temp.path().join("image/shot.ppm"));

        let err = resolve_image(&temp.path().join("image"), Path::new("label/shot.png"))
            .unwrap_err();
        assert!(matches!(err, SeguiError::MissingPair { .. }));
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn index_skips_unpaired_labels() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path();
        for name in ["a", "b", "c"] {
            touch(&root.join(format!("train/label/{name}.png")));
        }
        touch(&root.join("train/image/a.jpg"));
        touch(&root.join("train/image/c.png"));

        let mut report = Report::new();
        let records = index(root, "train", &IndexOptions::default(), &mut report);

        assert_eq!(records.len(), 2);
        assert!(records[0].label_path.ends_with("a.png"));
        assert!(records[0].image_path.ends_with("a.jpg"));
        assert!(records[1].label_path.ends_with("c.png"));
        assert_eq!(report.with_code(IssueCode::MissingImage).count(), 1);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn index_reports_images_without_labels() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path();
        touch(&root.join("val/label/a.png"));
        touch(&root.join("val/image/a.png"));
        touch(&root.join("val/image/orphan.jpg"));
        touch(&root.join("val/image/notes.txt"));

        let mut report = Report::new();
        let records = index(root, "val", &IndexOptions::default(), &mut report);

        assert_eq!(records.len(), 1);
        let orphans: Vec<_> = report.with_code(IssueCode::MissingLabel).collect();
        assert_eq!(orphans.len(), 1);
        assert!(orphans[0].context.to_string().ends_with("orphan.jpg"));
    }

    #[test]
    fn missing_directory_yields_empty_result() {
        let temp = tempfile::tempdir().expect("create temp dir");
        touch(&temp.path().join("train/label/a.png"));

        let mut report = Report::new();
        let records = index(temp.path(), "train", &IndexOptions::default(), &mut report);

        assert!(records.is_empty());
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.with_code(IssueCode::MissingDirectory).count(), 1);
    }

    #[test]
    fn train_merges_val_after_primary_pass() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path();
        touch(&root.join("train/label/t.png"));
        touch(&root.join("train/image/t.png"));
        touch(&root.join("val/label/v.png"));
        touch(&root.join("val/image/v.jpeg"));

        let options = IndexOptions {
            include_val: true,
            ..Default::default()
        };
        let mut report = Report::new();
        let records = index(root, "train", &options, &mut report);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].split, "train");
        assert_eq!(records[1].split, "val");

        let mut report = Report::new();
        let val_only = index(root, "val", &options, &mut report);
        assert_eq!(val_only.len(), 1);
    }
}
