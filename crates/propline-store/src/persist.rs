//! Reading and writing properties files through the write registry
//!
//! Reads decode ISO-8859-1 and unescape each line; writes replace the whole
//! file with already escaped UTF-8 text. Every read holds a [`ReadGuard`] and
//! every write a [`WriteGuard`] for the duration of the file access.

use chrono::Utc;
use propline_core::codec::decode_line;
use propline_core::{log_op_end, log_op_error, log_op_start};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::StoreConfig;
use crate::errors::{invalid_path, io_error, read_error, write_error, Result};
use crate::queue::{ReadGuard, WriteGuard, WriteRegistry};

/// Read `path` into unescaped lines.
///
/// Waits while a write to the same path is in progress.
///
/// # Errors
///
/// `ERR_IO` with the failing line number and the last line read when the
/// file cannot be opened or read; `ERR_TIMEOUT` if the configured wait
/// elapses first.
pub fn read_lines(
    registry: &WriteRegistry,
    path: &Path,
    config: &StoreConfig,
) -> Result<Vec<String>> {
    log_op_start!("read_properties", path = %path.display());
    let start = Instant::now();

    let lines = read_lines_impl(registry, path, config).map_err(|e| {
        log_op_error!(
            "read_properties",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            path = %path.display()
        );
        e
    })?;

    log_op_end!(
        "read_properties",
        duration_ms = start.elapsed().as_millis() as u64,
        line_count = lines.len()
    );
    Ok(lines)
}

fn read_lines_impl(
    registry: &WriteRegistry,
    path: &Path,
    config: &StoreConfig,
) -> Result<Vec<String>> {
    let _guard = acquire_read(registry, path, config)?;

    let file = File::open(path).map_err(|e| read_error(path, 1, "", e))?;
    let mut reader = BufReader::new(file);
    let mut lines: Vec<String> = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|e| {
            let last = lines.last().map_or("", String::as_str);
            read_error(path, lines.len() + 1, last, e)
        })?;
        if read == 0 {
            break;
        }
        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf);
        lines.push(decode_line(raw));
    }
    Ok(lines)
}

/// Replace the contents of `path` with `text`.
///
/// Queues behind earlier writers to the same path and waits for active
/// readers, then truncates and writes the whole text before flushing.
///
/// # Errors
///
/// `ERR_IO` if the file cannot be written; `ERR_TIMEOUT` if the configured
/// wait elapses before the write may start.
pub fn save(registry: &WriteRegistry, path: &Path, text: &str, config: &StoreConfig) -> Result<()> {
    log_op_start!("save", path = %path.display());
    let start = Instant::now();

    save_impl(registry, path, text, config).map_err(|e| {
        log_op_error!(
            "save",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            path = %path.display()
        );
        e
    })?;

    log_op_end!(
        "save",
        duration_ms = start.elapsed().as_millis() as u64,
        bytes = text.len()
    );
    Ok(())
}

fn save_impl(
    registry: &WriteRegistry,
    path: &Path,
    text: &str,
    config: &StoreConfig,
) -> Result<()> {
    let guard = acquire_write(registry, path, config)?;
    tracing::debug!(
        ticket = guard.seq(),
        path = %guard.path().display(),
        "writing file"
    );

    let mut file = File::create(path).map_err(|e| write_error(path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| write_error(path, e))?;
    file.flush().map_err(|e| write_error(path, e))?;
    Ok(())
}

/// Archive `old_text` under the versioning directory, then save `new_text`.
///
/// The backup goes to `<parent>/<versioning_dir>/<stem>_<epoch-millis>.<ext>`
/// where `stem` is the file name up to its first `.`. The backup name is
/// claimed by creating the file exclusively, so concurrent saves never share
/// one. Both writes go through the registry separately; the pair is not
/// atomic. Returns the absolute backup path.
///
/// # Errors
///
/// `ERR_INVALID_INPUT` if `path` has no file name, otherwise as [`save`].
pub fn save_with_versioning(
    registry: &WriteRegistry,
    path: &Path,
    old_text: &str,
    new_text: &str,
    config: &StoreConfig,
) -> Result<PathBuf> {
    log_op_start!("save_with_versioning", path = %path.display());
    let start = Instant::now();

    let backup = archive(registry, path, old_text, config)
        .and_then(|backup| save(registry, path, new_text, config).map(|()| backup))
        .map_err(|e| {
            log_op_error!(
                "save_with_versioning",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                path = %path.display()
            );
            e
        })?;

    log_op_end!(
        "save_with_versioning",
        duration_ms = start.elapsed().as_millis() as u64,
        backup = %backup.display()
    );
    Ok(backup)
}

fn archive(
    registry: &WriteRegistry,
    path: &Path,
    old_text: &str,
    config: &StoreConfig,
) -> Result<PathBuf> {
    let stem = backup_stem(path)?;
    let dir = versioning_dir(path, config);
    fs::create_dir_all(&dir).map_err(|e| io_error("create_versioning_dir", e))?;
    let dir = dir
        .canonicalize()
        .map_err(|e| io_error("resolve_versioning_dir", e))?;

    let backup = claim_backup(&dir, stem, config)?;
    save(registry, &backup, old_text, config)?;
    Ok(backup)
}

/// Create an empty, previously unused backup file named after the current time
fn claim_backup(dir: &Path, stem: &str, config: &StoreConfig) -> Result<PathBuf> {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let backup = backup_path(dir, stem, millis, config);
        match OpenOptions::new().write(true).create_new(true).open(&backup) {
            Ok(_) => return Ok(backup),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
            Err(e) => return Err(write_error(&backup, e)),
        }
    }
}

/// Directory receiving backups of `path`
pub fn versioning_dir(path: &Path, config: &StoreConfig) -> PathBuf {
    path.parent()
        .unwrap_or_else(|| Path::new(""))
        .join(&config.versioning_dir)
}

fn backup_stem(path: &Path) -> Result<&str> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| invalid_path(path))?;
    Ok(name.split('.').next().unwrap_or(name))
}

fn backup_path(dir: &Path, stem: &str, millis: i64, config: &StoreConfig) -> PathBuf {
    dir.join(format!("{}_{}.{}", stem, millis, config.backup_extension))
}

fn acquire_read(
    registry: &WriteRegistry,
    path: &Path,
    config: &StoreConfig,
) -> Result<ReadGuard> {
    match config.wait_timeout() {
        Some(timeout) => registry.read_timeout(path, timeout),
        None => Ok(registry.read(path)),
    }
}

fn acquire_write(
    registry: &WriteRegistry,
    path: &Path,
    config: &StoreConfig,
) -> Result<WriteGuard> {
    let ticket = registry.enqueue(path);
    match config.wait_timeout() {
        Some(timeout) => ticket.wait_timeout(timeout),
        None => Ok(ticket.wait()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propline_core::ExErrorKind;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_read_lines_decodes_and_unescapes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.properties");
        fs::write(&path, b"a=caf\\u00E9\r\nb=\xE9\nc=x").unwrap();

        let lines = read_lines(&WriteRegistry::new(), &path, &StoreConfig::default()).unwrap();

        assert_eq!(lines, vec!["a=caf\u{e9}", "b=\u{e9}", "c=x"]);
    }

    #[test]
    fn test_read_missing_file_reports_line_one() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.properties");

        let err = read_lines(&WriteRegistry::new(), &path, &StoreConfig::default()).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn test_save_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.properties");
        fs::write(&path, "old=long content\n").unwrap();

        save(&WriteRegistry::new(), &path, "a=1\n", &StoreConfig::default()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a=1\n");
    }

    #[test]
    fn test_backup_name_uses_stem_before_first_dot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages_fr.ui.properties");
        let registry = WriteRegistry::new();

        let backup =
            save_with_versioning(&registry, &path, "a=old\n", "a=new\n", &StoreConfig::default())
                .unwrap();

        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("messages_fr_"));
        assert!(name.ends_with(".properties"));
        assert_eq!(
            backup.parent().unwrap(),
            dir.path().join("temp").canonicalize().unwrap()
        );
    }

    #[test]
    fn test_concurrent_versioned_saves_keep_every_backup() {
        let dir = TempDir::new().unwrap();
        let path = Arc::new(dir.path().join("m.properties"));
        let registry = WriteRegistry::new();
        let writers = 8;
        let barrier = Arc::new(Barrier::new(writers));

        let handles: Vec<_> = (0..writers)
            .map(|i| {
                let registry = registry.clone();
                let path = Arc::clone(&path);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let old = format!("v={}\n", i);
                    barrier.wait();
                    let backup = save_with_versioning(
                        &registry,
                        &path,
                        &old,
                        "v=new\n",
                        &StoreConfig::default(),
                    )
                    .unwrap();
                    (backup, old)
                })
            })
            .collect();
        let results: Vec<(PathBuf, String)> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let distinct: HashSet<&PathBuf> = results.iter().map(|(b, _)| b).collect();
        assert_eq!(distinct.len(), writers);
        for (backup, old) in &results {
            assert_eq!(&fs::read_to_string(backup).unwrap(), old);
        }
        assert_eq!(fs::read_dir(dir.path().join("temp")).unwrap().count(), writers);
    }

    #[test]
    fn test_backups_in_same_millisecond_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.properties");
        let registry = WriteRegistry::new();
        let config = StoreConfig::default();

        let first = save_with_versioning(&registry, &path, "v=1\n", "v=2\n", &config).unwrap();
        let second = save_with_versioning(&registry, &path, "v=2\n", "v=3\n", &config).unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(first).unwrap(), "v=1\n");
        assert_eq!(fs::read_to_string(second).unwrap(), "v=2\n");
    }
}
