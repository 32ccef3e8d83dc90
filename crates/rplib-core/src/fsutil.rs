use std::fs::{DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

/// Writes `contents` to `path`, creating it with `mode` if absent.
///
/// The mode only applies on creation; an existing file is truncated and
/// keeps its permissions.
pub fn write_file(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.flush()
}

/// Creates a single directory with `mode`, failing if it already exists.
pub fn create_dir(path: &Path, mode: u32) -> io::Result<()> {
    builder(mode).create(path)
}

/// Creates a directory and any missing parents with `mode`.
pub fn create_dir_all(path: &Path, mode: u32) -> io::Result<()> {
    builder(mode).recursive(true).create(path)
}

fn builder(mode: u32) -> DirBuilder {
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    builder.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;
    builder
}
