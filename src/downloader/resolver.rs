// Locate the artifact the extractor left on disk

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::extraction::AUDIO_CODEC;
use super::models::DownloadKind;

/// `base` with `.ext` appended, keeping any dots already in the name.
pub fn with_extension(base: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Find the file produced for `base`.
///
/// Audio has a fixed extension, so exactly one candidate is checked. Video
/// extensions are picked by the extractor at download time: every file whose
/// stem equals the base name is a candidate and the lexicographically smallest
/// wins. Partial downloads (`.mp4.part`) have a different stem and never match.
pub fn resolve(base: &Path, kind: DownloadKind) -> Option<PathBuf> {
    match kind {
        DownloadKind::Audio => {
            let candidate = with_extension(base, AUDIO_CODEC);
            candidate.is_file().then_some(candidate)
        }
        DownloadKind::Video => resolve_any_extension(base),
    }
}

fn resolve_any_extension(base: &Path) -> Option<PathBuf> {
    let stem = base.file_name()?;
    let dir = match base.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut names: Vec<OsString> = fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map_or(false, |t| t.is_file()))
        .map(|entry| entry.file_name())
        .filter(|name| {
            let path = Path::new(name);
            path.extension().is_some() && path.file_stem() == Some(stem)
        })
        .collect();

    names.sort();
    names.into_iter().next().map(|name| base.with_file_name(name))
}
