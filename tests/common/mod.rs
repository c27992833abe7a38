#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Bytes written for a raw image, unique per class/file pair.
pub fn image_bytes(class: &str, file_name: &str) -> Vec<u8> {
    format!("{class}/{file_name}").into_bytes()
}

/// Create `<root>/<class>/<file>` for every listed pair.
pub fn write_raw_tree(root: &Path, classes: &[(&str, &[&str])]) {
    for (class, files) in classes {
        let dir = root.join(class);
        fs::create_dir_all(&dir).expect("create class dir");
        for file_name in *files {
            fs::write(dir.join(file_name), image_bytes(class, file_name)).expect("write image");
        }
    }
}

/// File names directly inside `dir` (empty when `dir` is missing).
pub fn file_names(dir: &Path) -> BTreeSet<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return BTreeSet::new();
    };
    entries
        .map(|entry| entry.expect("read dir entry"))
        .filter(|entry| entry.file_type().expect("file type").is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}

/// True if `dir` contains nothing at all (or does not exist).
pub fn is_empty_or_missing(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}
