use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// First four bytes of the SHA-256 of `s`, hex encoded (8 chars).
///
/// Stable across runs; used to disambiguate import aliases and harness file
/// names of packages that share a name.
pub fn short_hash(s: &str) -> String {
    let digest = Sha256::digest(s.as_bytes());
    hex::encode(&digest[..4])
}

/// Strip `prefix` from an import path, leaving a path relative to the module root.
///
/// `example.com/repo/pkg/store` with prefix `example.com/repo` becomes
/// `pkg/store`. An empty prefix or a non-matching path is returned unchanged
/// (minus any leading `/`).
pub fn strip_module_prefix<'a>(import_path: &'a str, prefix: &str) -> &'a str {
    let rest = match import_path.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
        _ => import_path,
    };
    rest.trim_start_matches('/')
}

/// Write `value` as pretty JSON to `path`, or to stdout when `path` is `-`.
///
/// A closed stdout pipe is not an error; any other write or flush failure is.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if path.as_os_str() == "-" {
        let stdout = io::stdout();
        let result = write_pretty(BufWriter::new(stdout.lock()), value);
        return match result {
            Err(e) if is_broken_pipe(&e) => Ok(()),
            other => other,
        };
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_pretty(BufWriter::new(file), value).with_context(|| format!("write {}", path.display()))
}

fn write_pretty<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value).context("serialize JSON")?;
    writer.write_all(b"\n").context("write JSON")?;
    writer.flush().context("flush JSON")?;
    Ok(())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .map(|e| e.kind() == io::ErrorKind::BrokenPipe)
            .or_else(|| {
                cause
                    .downcast_ref::<serde_json::Error>()
                    .and_then(serde_json::Error::io_error_kind)
                    .map(|kind| kind == io::ErrorKind::BrokenPipe)
            })
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash_is_stable() {
        // sha256("abc") = ba7816bf...
        assert_eq!(short_hash("abc"), "ba7816bf");
        assert_eq!(short_hash("abc").len(), 8);
        assert_ne!(short_hash("a/b"), short_hash("a/c"));
    }

    #[test]
    fn test_strip_module_prefix() {
        assert_eq!(
            strip_module_prefix("example.com/repo/pkg/store", "example.com/repo"),
            "pkg/store"
        );
        assert_eq!(strip_module_prefix("example.com/repo", "example.com/repo"), "");
        assert_eq!(strip_module_prefix("other.org/x", "example.com/repo"), "other.org/x");
        assert_eq!(strip_module_prefix("example.com/x", ""), "example.com/x");
        assert_eq!(
            strip_module_prefix("example.com/repository/x", "example.com/repo"),
            "example.com/repository/x"
        );
    }

    #[test]
    fn test_write_json_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("summary.json");
        write_json(&path, &serde_json::json!({"emitted": 2})).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["emitted"], 2);
        assert!(raw.ends_with('\n'));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_json_reports_full_device() {
        let err = write_json(Path::new("/dev/full"), &serde_json::json!({"emitted": 2})).unwrap_err();
        assert!(format!("{:#}", err).contains("/dev/full"));
    }
}
