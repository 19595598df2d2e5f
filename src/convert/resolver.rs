//! Texture file resolution.
//!
//! Maps (material name, channel) to a candidate file by walking a directory
//! tree. Matching is filename-only and case-insensitive; image content is
//! never inspected.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::channel::Channel;

/// Accepted texture file extensions (lower-case, without the dot).
pub const TEXTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tga", "tif", "tiff", "exr"];

/// Resolves texture files for semantic channels under one directory root.
#[derive(Clone, Debug)]
pub struct TextureResolver {
    root: PathBuf,
}

impl TextureResolver {
    /// Create a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this resolver searches.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a texture for `material` and `channel`.
    ///
    /// Two passes over one recursive walk, entries sorted by name at every
    /// level so ties break reproducibly:
    /// 1. first file whose name contains both the material name and a
    ///    channel keyword wins immediately;
    /// 2. failing that, the first file whose name contains a channel
    ///    keyword at all.
    ///
    /// Returns `None` when nothing matches; a miss is not an error.
    pub fn resolve(&self, material: &str, channel: Channel) -> Option<PathBuf> {
        let keywords = channel.keywords();
        if keywords.is_empty() {
            return None;
        }
        let material = material.to_lowercase();
        let mut fallback: Option<PathBuf> = None;

        for path in walk_sorted(&self.root) {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let name = name.to_lowercase();
            if !has_texture_extension(&name) {
                continue;
            }
            if !keywords.iter().any(|kw| name.contains(kw)) {
                continue;
            }
            if !material.is_empty() && name.contains(&material) {
                debug!(%material, ?channel, path = %path.display(), "texture matched");
                return Some(path);
            }
            if fallback.is_none() {
                fallback = Some(path);
            }
        }

        match &fallback {
            Some(path) => {
                debug!(%material, ?channel, path = %path.display(), "keyword-only fallback")
            }
            None => debug!(%material, ?channel, "no texture found"),
        }
        fallback
    }
}

fn has_texture_extension(lower_name: &str) -> bool {
    TEXTURE_EXTENSIONS
        .iter()
        .any(|ext| match lower_name.strip_suffix(ext) {
            Some(stem) => stem.ends_with('.'),
            None => false,
        })
}

/// Recursively list files under `dir`: files of each directory first, then
/// subdirectories, both in name order. Unreadable directories are skipped.
/// Symlinked files are listed; symlinked directories are not descended
/// into, so a link pointing back up the tree cannot loop the walk.
fn walk_sorted(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), %err, "skipping unreadable directory");
            return files;
        }
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        let Ok(meta) = fs::symlink_metadata(&path) else {
            continue;
        };
        if meta.is_dir() {
            subdirs.push(path);
        } else if !meta.file_type().is_symlink() || !path.is_dir() {
            files.push(path);
        }
    }
    for subdir in subdirs {
        files.extend(walk_sorted(&subdir));
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).expect("create test file");
    }

    #[test]
    fn test_pass_one_prefers_material_match() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "generic_basecolor.png");
        touch(dir.path(), "matA_basecolor.png");

        let resolver = TextureResolver::new(dir.path());
        let found = resolver.resolve("matA", Channel::BaseColor).unwrap();
        assert_eq!(found.file_name().unwrap(), "matA_basecolor.png");
    }

    #[test]
    fn test_pass_two_falls_back_to_keyword_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "generic_roughness.png");

        let resolver = TextureResolver::new(dir.path());
        let found = resolver
            .resolve("matB", Channel::SpecularRoughness)
            .unwrap();
        assert_eq!(found.file_name().unwrap(), "generic_roughness.png");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "MatA_BaseColor.PNG");

        let resolver = TextureResolver::new(dir.path());
        let found = resolver.resolve("mata", Channel::BaseColor).unwrap();
        assert_eq!(found.file_name().unwrap(), "MatA_BaseColor.PNG");
    }

    #[test]
    fn test_non_texture_extensions_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "matA_basecolor.txt");
        touch(dir.path(), "matA_basecolor.png.bak");

        let resolver = TextureResolver::new(dir.path());
        assert!(resolver.resolve("matA", Channel::BaseColor).is_none());
    }

    #[test]
    fn test_recurses_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("4k").join("final");
        fs::create_dir_all(&sub).unwrap();
        touch(&sub, "matA_normal.tif");

        let resolver = TextureResolver::new(dir.path());
        let found = resolver.resolve("matA", Channel::Normal).unwrap();
        assert_eq!(found, sub.join("matA_normal.tif"));
    }

    #[test]
    fn test_sorted_walk_breaks_ties_by_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "matA_diffuse_b.png");
        touch(dir.path(), "matA_diffuse_a.png");

        let resolver = TextureResolver::new(dir.path());
        let found = resolver.resolve("matA", Channel::BaseColor).unwrap();
        assert_eq!(found.file_name().unwrap(), "matA_diffuse_a.png");
    }

    #[test]
    fn test_same_file_can_serve_two_channels() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "matA_diffuse_alpha.png");

        let resolver = TextureResolver::new(dir.path());
        let base = resolver.resolve("matA", Channel::BaseColor).unwrap();
        let opacity = resolver.resolve("matA", Channel::Opacity).unwrap();
        assert_eq!(base, opacity);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "matA_basecolor.png");
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let resolver = TextureResolver::new(dir.path());
        let found = resolver.resolve("matA", Channel::BaseColor).unwrap();
        assert_eq!(found.file_name().unwrap(), "matA_basecolor.png");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_matched() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "archived.png");
        std::os::unix::fs::symlink(
            dir.path().join("archived.png"),
            dir.path().join("matA_metalness.png"),
        )
        .unwrap();

        let resolver = TextureResolver::new(dir.path());
        let found = resolver.resolve("matA", Channel::Metalness).unwrap();
        assert_eq!(found.file_name().unwrap(), "matA_metalness.png");
    }

    #[test]
    fn test_miss_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "matA_basecolor.png");

        let resolver = TextureResolver::new(dir.path());
        assert!(resolver.resolve("matA", Channel::Metalness).is_none());
    }
}
