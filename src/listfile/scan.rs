//! Build file lists from a directory of numbered segments

use std::cmp::Ordering;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::FramecatResult;

/// Regular files directly inside `dir` whose extension matches
/// `extension` (case-insensitive), in natural name order
pub fn scan_directory(dir: &Path, extension: &str) -> FramecatResult<Vec<PathBuf>> {
    let wanted = extension.trim_start_matches('.').to_ascii_lowercase();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase() == wanted)
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        } else {
            debug!("Skipping {}", entry.path().display());
        }
    }

    files.sort_by(|a, b| {
        let a_name = a.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let b_name = b.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        natural_cmp(&a_name, &b_name)
    });

    info!("Found {} .{} file(s) in {}", files.len(), wanted, dir.display());
    Ok(files)
}

/// Write one path per line, newline-terminated
pub fn write_list<W: Write>(paths: &[PathBuf], mut writer: W) -> FramecatResult<()> {
    for path in paths {
        writeln!(writer, "{}", path.display())?;
    }
    writer.flush()?;
    Ok(())
}

/// Compare names so that digit runs order numerically:
/// `video2` < `video10`
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.as_bytes();
    let mut right = b.as_bytes();

    loop {
        match (left.first(), right.first()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let (l_digits, l_rest) = split_digits(left);
                let (r_digits, r_rest) = split_digits(right);
                let ordering = compare_numeric(l_digits, r_digits);
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left = l_rest;
                right = r_rest;
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(r);
                }
                left = &left[1..];
                right = &right[1..];
            }
        }
    }
}

fn split_digits(bytes: &[u8]) -> (&[u8], &[u8]) {
    let end = bytes.iter().position(|b| !b.is_ascii_digit()).unwrap_or(bytes.len());
    bytes.split_at(end)
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let a = trim_leading_zeros(a);
    let b = trim_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let start = digits.iter().position(|&d| d != b'0').unwrap_or(digits.len());
    &digits[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_natural_order() {
        let mut names = vec!["video10.ts", "video2.ts", "video1.ts", "video0.ts"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["video0.ts", "video1.ts", "video2.ts", "video10.ts"]);
    }

    #[test]
    fn test_natural_order_leading_zeros() {
        assert_eq!(natural_cmp("part007", "part7"), Ordering::Less);
        assert_eq!(natural_cmp("part007", "part8"), Ordering::Less);
        assert_eq!(natural_cmp("a", "b"), Ordering::Less);
        assert_eq!(natural_cmp("clip", "clip1"), Ordering::Less);
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["seg10.mp4", "seg2.MP4", "seg1.mp4", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.mp4")).unwrap();

        let files = scan_directory(dir.path(), ".mp4").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["seg1.mp4", "seg2.MP4", "seg10.mp4"]);
    }

    #[test]
    fn test_write_list() {
        let mut out = Vec::new();
        write_list(&[PathBuf::from("a.mp4"), PathBuf::from("b.mp4")], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a.mp4\nb.mp4\n");
    }
}
