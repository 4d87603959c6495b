use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const META_SUFFIX: &str = ".meta";
pub const PRIVKEYS_SUFFIX: &str = ".privkeys.txt";
pub const PUBKEYS_SUFFIX: &str = ".realpubkeys.txt";
pub const RECON_SUFFIX: &str = "-recon-real";

/// `base` with `suffix` appended to its final component
pub fn artifact_path(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Every file an encode/decode pair touches for one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub meta: PathBuf,
    pub privkeys: PathBuf,
    pub pubkeys: PathBuf,
    pub reconstructed: PathBuf,
}

impl ArtifactPaths {
    pub fn for_base(base: &Path) -> ArtifactPaths {
        ArtifactPaths {
            meta: artifact_path(base, META_SUFFIX),
            privkeys: artifact_path(base, PRIVKEYS_SUFFIX),
            pubkeys: artifact_path(base, PUBKEYS_SUFFIX),
            reconstructed: artifact_path(base, RECON_SUFFIX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_names() {
        let paths = ArtifactPaths::for_base(Path::new("dir/photo.jpg"));
        assert_eq!(paths.meta, PathBuf::from("dir/photo.jpg.meta"));
        assert_eq!(paths.privkeys, PathBuf::from("dir/photo.jpg.privkeys.txt"));
        assert_eq!(paths.pubkeys, PathBuf::from("dir/photo.jpg.realpubkeys.txt"));
        assert_eq!(paths.reconstructed, PathBuf::from("dir/photo.jpg-recon-real"));
    }
}
