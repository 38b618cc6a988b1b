//! Artifact output.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use shdc_reflect::ShdcResult;

use crate::compiler::io_error;

/// Write every `(path, content)` pair, replacing existing files only once
/// all of them have been written.
///
/// Each file is first written to a `.tmp` sibling, then renamed over its
/// target. If any temporary write fails, the temporaries are removed and
/// the targets are left untouched. A target that already exists is moved to
/// a `.bak` sibling while the pair is committed, so a failed rename puts the
/// previous files back instead of leaving a mixed pair.
pub fn write_atomic(files: &[(&Path, &str)]) -> ShdcResult<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for &(path, content) in files {
        let tmp = tmp_path(path);
        if let Err(err) = write_file(&tmp, content) {
            discard(&staged);
            return Err(err);
        }
        staged.push((tmp, path));
    }

    let mut committed: Vec<(&Path, Option<PathBuf>)> = Vec::with_capacity(staged.len());
    for (i, (tmp, path)) in staged.iter().enumerate() {
        debug!("writing {}", path.display());
        match commit(tmp, path) {
            Ok(backup) => committed.push((*path, backup)),
            Err(err) => {
                roll_back(&committed);
                discard(&staged[i..]);
                return Err(err);
            }
        }
    }
    for (_, backup) in &committed {
        if let Some(backup) = backup {
            let _ = fs::remove_file(backup);
        }
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> ShdcResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
    }
    fs::write(path, content).map_err(|e| io_error(path, e))
}

/// Move `tmp` over `path`, returning the backup of the file it replaced.
fn commit(tmp: &Path, path: &Path) -> ShdcResult<Option<PathBuf>> {
    let backup = if path.is_file() {
        let backup = sibling(path, "bak");
        fs::rename(path, &backup).map_err(|e| io_error(path, e))?;
        Some(backup)
    } else {
        None
    };
    if let Err(err) = fs::rename(tmp, path) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, path);
        }
        return Err(io_error(path, err));
    }
    Ok(backup)
}

/// Undo committed renames, newest first.
fn roll_back(committed: &[(&Path, Option<PathBuf>)]) {
    for (path, backup) in committed.iter().rev() {
        match backup {
            Some(backup) => {
                let _ = fs::rename(backup, path);
            }
            None => {
                let _ = fs::remove_file(path);
            }
        }
    }
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

pub fn tmp_path(path: &Path) -> PathBuf {
    sibling(path, "tmp")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shdc-output-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_writes_both_and_leaves_no_temporaries() {
        let dir = scratch("pair");
        let header = dir.join("gen").join("shaders.h");
        let source = dir.join("gen").join("shaders.c");
        write_atomic(&[(&header, "decl"), (&source, "defn")]).unwrap();

        assert_eq!(fs::read_to_string(&header).unwrap(), "decl");
        assert_eq!(fs::read_to_string(&source).unwrap(), "defn");
        assert!(!tmp_path(&header).exists());
        assert!(!tmp_path(&source).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_write_keeps_targets() {
        let dir = scratch("fail");
        fs::create_dir_all(&dir).unwrap();
        let header = dir.join("shaders.h");
        fs::write(&header, "old").unwrap();
        // A directory squatting on the temporary name makes the second write fail.
        let source = dir.join("shaders.c");
        fs::create_dir_all(tmp_path(&source)).unwrap();

        assert!(write_atomic(&[(&header, "new"), (&source, "defn")]).is_err());
        assert_eq!(fs::read_to_string(&header).unwrap(), "old");
        assert!(!tmp_path(&header).exists());
        assert!(!source.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_rename_restores_previous_pair() {
        let dir = scratch("rename");
        let header = dir.join("shaders.h");
        let source = dir.join("shaders.c");
        fs::create_dir_all(source.join("occupied")).unwrap();
        fs::write(&header, "old").unwrap();

        // The header is replaced first, then the source can't be renamed over a directory.
        assert!(write_atomic(&[(&header, "new"), (&source, "defn")]).is_err());
        assert_eq!(fs::read_to_string(&header).unwrap(), "old");
        assert!(source.is_dir());
        for path in [&header, &source] {
            assert!(!tmp_path(path).exists());
            assert!(!sibling(path, "bak").exists());
        }
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_replaces_existing_files() {
        let dir = scratch("replace");
        fs::create_dir_all(&dir).unwrap();
        let header = dir.join("shaders.h");
        fs::write(&header, "old").unwrap();

        write_atomic(&[(&header, "new")]).unwrap();
        assert_eq!(fs::read_to_string(&header).unwrap(), "new");
        assert!(!sibling(&header, "bak").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
