use std::{fs, path::Path};

use anyhow::{Context, Result};

/// Read every file with the given extension from a directory tree.
///
/// Returns `(id, contents)` pairs where the id is the file's path relative
/// to the root with the extension stripped and `/` as the separator. Entries
/// come out sorted by path so loading order is stable. A missing directory
/// yields no entries.
pub fn read_data_dir(
    path: impl AsRef<Path>,
    extension: &str,
) -> Result<Vec<(String, String)>> {
    let root = path.as_ref();
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut ret = Vec::new();
    for e in walkdir::WalkDir::new(root).sort_by_file_name() {
        let e = e.with_context(|| format!("reading {}", root.display()))?;
        if !e.file_type().is_file() {
            continue;
        }

        let file = e.path();
        if file.extension().and_then(|a| a.to_str()) != Some(extension) {
            continue;
        }

        let id = file
            .strip_prefix(root)?
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let contents = fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?;
        ret.push((id, contents));
    }

    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_dir_is_empty() {
        let ret = read_data_dir("/nonexistent/data/dir", "json").unwrap();
        assert!(ret.is_empty());
    }

    #[test]
    fn reads_nested_files() {
        let root = std::env::temp_dir()
            .join(format!("util-data-dir-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a.json"), "1").unwrap();
        fs::write(root.join("sub/b.json"), "2").unwrap();
        fs::write(root.join("notes.txt"), "skip").unwrap();

        let ret = read_data_dir(&root, "json").unwrap();
        fs::remove_dir_all(&root).unwrap();

        assert_eq!(
            ret,
            vec![
                ("a".to_string(), "1".to_string()),
                ("sub/b".to_string(), "2".to_string())
            ]
        );
    }
}
