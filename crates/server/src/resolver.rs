use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

/// File served when a request names a directory.
pub const INDEX_FILE: &str = "index.html";

/// Where a request uri points on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    /// A path under the base directory. It may not exist.
    File(PathBuf),
    /// The uri tried to leave the base directory.
    Escaped,
}

/// Maps decoded request uris onto files below a base directory.
///
/// Resolution is purely lexical: `.` and `..` segments are folded without touching
/// the file system, and any `..` that would climb above the base directory, even
/// temporarily, makes the whole uri [`ResolvedPath::Escaped`].
///
/// This is stricter than checking only the normalized result: with base `/srv/www`,
/// `/a/../../www/index.html` folds back to `/srv/www/index.html` but is still refused,
/// since the uri only reaches it by naming the base directory from outside.
#[derive(Debug, Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    /// Creates a resolver rooted at `base_dir`, made absolute against the current
    /// directory.
    pub fn new(base_dir: impl AsRef<Path>) -> io::Result<Self> {
        let absolute = std::path::absolute(base_dir)?;
        Ok(Self { base_dir: normalize(&absolute) })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolves `uri` and substitutes [`INDEX_FILE`] when it names a directory.
    pub async fn resolve(&self, uri: &str) -> ResolvedPath {
        let ResolvedPath::File(path) = self.join(uri) else {
            return ResolvedPath::Escaped;
        };

        if is_dir(&path).await {
            debug!(path = %path.display(), "uri names a directory, serving its index");
            return ResolvedPath::File(path.join(INDEX_FILE));
        }
        ResolvedPath::File(path)
    }

    /// Lexically joins the path part of `uri` onto the base directory.
    pub fn join(&self, uri: &str) -> ResolvedPath {
        let path = uri.split_once('?').map_or(uri, |(path, _query)| path);

        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return ResolvedPath::Escaped;
                    }
                }
                name if is_plain_name(name) => segments.push(name),
                _ => return ResolvedPath::Escaped,
            }
        }

        let resolved: PathBuf = segments.iter().fold(self.base_dir.clone(), |path, segment| path.join(segment));
        if resolved.starts_with(&self.base_dir) { ResolvedPath::File(resolved) } else { ResolvedPath::Escaped }
    }
}

/// A segment must be a single ordinary file name on this platform; anything that
/// parses as a root, a drive prefix or several components is refused.
fn is_plain_name(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|metadata| metadata.is_dir())
}
