//! File helpers shared by the codecs and the CLI.
//!
//! The codecs open their own handles; this module only centralizes path checks, the
//! open/create boilerplate with error context, and output-path naming.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};

use crate::config::FILE_EXTENSION;
use crate::error::CipherError;
use crate::types::ProcessorMode;

/// Rejects empty paths, and an output that is the input itself, before any work starts.
///
/// Runs before the output is created, since creating it truncates the file.
pub fn check_paths(input: &Path, output: &Path) -> Result<()> {
    ensure!(!input.as_os_str().is_empty() && !output.as_os_str().is_empty(), CipherError::EmptyPath);

    if let (Ok(input), Ok(output)) = (fs::canonicalize(input), fs::canonicalize(output)) {
        ensure!(input != output, CipherError::SamePath);
    }
    Ok(())
}

pub fn open_file(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("cannot open input file: {}", path.display()))
}

/// Creates (or truncates) `path`, creating missing parent directories.
pub fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("cannot open output file: {}", path.display()))
}

/// Size of the file at `path` in bytes.
pub fn file_size(path: &Path) -> Result<u64> {
    let meta = fs::metadata(path).with_context(|| format!("failed to get metadata: {}", path.display()))?;
    Ok(meta.len())
}

/// Default output path: append `.chx` when encrypting, strip it when decrypting.
pub fn output_path(input: &Path, mode: ProcessorMode) -> PathBuf {
    match mode {
        ProcessorMode::Encrypt => {
            let mut name = input.as_os_str().to_owned();
            name.push(FILE_EXTENSION);
            PathBuf::from(name)
        }
        ProcessorMode::Decrypt => {
            let text = input.to_string_lossy();
            match text.strip_suffix(FILE_EXTENSION) {
                Some(stem) if !stem.is_empty() => PathBuf::from(stem),
                _ => input.with_extension("dec"),
            }
        }
    }
}

/// Checks that `path` names an existing regular file.
pub async fn validate_input(path: &Path) -> Result<u64> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => bail!("file not found: {}", path.display()),
        Err(e) => return Err(e).with_context(|| format!("stat failed: {}", path.display())),
    };

    if meta.is_dir() {
        bail!("path is a directory: {}", path.display());
    }

    Ok(meta.len())
}
