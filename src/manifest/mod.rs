//! `data.yaml` manifest for Ultralytics-style training tools.
//!
//! The manifest is rendered from a fixed template so the comment lines survive;
//! reading it back goes through `serde_yaml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classes::ClassMap;
use crate::error::PrepError;
use crate::split::SplitKind;

/// File name of the manifest inside the output root.
pub const MANIFEST_FILE: &str = "data.yaml";

/// Largest number of missing IDs tolerated in a `names` mapping.
const MAX_NAME_GAP: usize = 1024;

/// Render the manifest text.
pub fn render_manifest(classes: &ClassMap, manifest_path: &str, dataset_name: &str) -> String {
    let mut yaml = String::new();
    yaml.push_str(&format!("# Dataset: {}\n", dataset_name));
    yaml.push_str("# Generated automatically\n");
    yaml.push('\n');
    yaml.push_str("# Paths (relative to this file)\n");
    yaml.push_str(&format!("path: {}\n", yaml_scalar(manifest_path)));
    for kind in SplitKind::ALL {
        yaml.push_str(&format!("{}: {}/images\n", kind.as_str(), kind.as_str()));
    }
    yaml.push('\n');
    yaml.push_str("# Number of classes\n");
    yaml.push_str(&format!("nc: {}\n", classes.len()));
    yaml.push('\n');
    yaml.push_str("# Class names\n");
    yaml.push_str("names:\n");
    for (id, name) in classes.iter() {
        yaml.push_str(&format!("  {}: {}\n", id, yaml_scalar(name)));
    }
    yaml.push('\n');
    yaml.push_str("# Additional information\n");
    yaml.push_str("# Images must be annotated in YOLO format\n");
    yaml.push_str("# Annotations go in .txt files with the format:\n");
    yaml.push_str("# class_id x_center y_center width height\n");
    yaml
}

/// Write `<output_root>/data.yaml`, replacing any previous manifest.
pub fn write_manifest(
    output_root: &Path,
    classes: &ClassMap,
    manifest_path: &str,
    dataset_name: &str,
) -> Result<PathBuf, PrepError> {
    let path = output_root.join(MANIFEST_FILE);
    let yaml = render_manifest(classes, manifest_path, dataset_name);
    fs::write(&path, yaml).map_err(|source| PrepError::ManifestWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Parsed contents of a manifest.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ManifestDoc {
    pub path: Option<String>,
    pub train: Option<String>,
    pub val: Option<String>,
    pub test: Option<String>,
    pub nc: Option<usize>,
    /// Class names indexed by ID; gaps in a mapping are `None`.
    pub names: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    path: Option<String>,
    train: Option<String>,
    val: Option<String>,
    test: Option<String>,
    nc: Option<usize>,
    #[serde(default)]
    names: Option<RawNames>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}

/// Read and parse a manifest file.
pub fn read_manifest(path: &Path) -> Result<ManifestDoc, PrepError> {
    let data = fs::read_to_string(path).map_err(|source| PrepError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&data, path)
}

fn parse_manifest(data: &str, path: &Path) -> Result<ManifestDoc, PrepError> {
    let raw: RawManifest =
        serde_yaml::from_str(data).map_err(|source| PrepError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

    let names = match raw.names {
        None => Vec::new(),
        Some(RawNames::Sequence(names)) => names.into_iter().map(Some).collect(),
        Some(RawNames::Mapping(mapping)) => match mapping.keys().max() {
            None => Vec::new(),
            Some(&max_index) => {
                if max_index >= mapping.len().saturating_add(MAX_NAME_GAP) {
                    return Err(PrepError::ManifestInvalid {
                        path: path.to_path_buf(),
                        message: format!(
                            "class ID {} is out of range for {} class name(s)",
                            max_index,
                            mapping.len()
                        ),
                    });
                }
                let mut names = vec![None; max_index + 1];
                for (index, name) in mapping {
                    names[index] = Some(name);
                }
                names
            }
        },
    };

    Ok(ManifestDoc {
        path: raw.path,
        train: raw.train,
        val: raw.val,
        test: raw.test,
        nc: raw.nc,
        names,
    })
}

impl ManifestDoc {
    /// Image directory listed for a split.
    pub fn split_path(&self, kind: SplitKind) -> Option<&str> {
        match kind {
            SplitKind::Train => self.train.as_deref(),
            SplitKind::Val => self.val.as_deref(),
            SplitKind::Test => self.test.as_deref(),
        }
    }
}

/// Emit a scalar bare when YAML reads it back as the same string, quoted
/// otherwise.
fn yaml_scalar(raw: &str) -> String {
    if needs_quoting(raw) {
        format!("'{}'", raw.replace('\'', "''"))
    } else {
        raw.to_string()
    }
}

fn needs_quoting(raw: &str) -> bool {
    const RESERVED: [&str; 11] = [
        "true", "false", "yes", "no", "on", "off", "null", "~", "y", "n", "",
    ];

    let Some(first) = raw.chars().next() else {
        return true;
    };

    raw.trim() != raw
        || RESERVED.contains(&raw.to_ascii_lowercase().as_str())
        || raw.parse::<f64>().is_ok()
        || "-?:,[]{}#&*!|>'\"%@`".contains(first)
        || raw.contains(": ")
        || raw.contains(" #")
        || raw.ends_with(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_matches_template_for_default_classes() {
        let yaml = render_manifest(&ClassMap::default(), "./data/processed", "Cacao diseases");
        let expected = "\
# Dataset: Cacao diseases
# Generated automatically

# Paths (relative to this file)
path: ./data/processed
train: train/images
val: val/images
test: test/images

# Number of classes
nc: 3

# Class names
names:
  0: Fito
  1: Monilia
  2: Sana

# Additional information
# Images must be annotated in YOLO format
# Annotations go in .txt files with the format:
# class_id x_center y_center width height
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn rendered_manifest_parses_back() {
        let classes = ClassMap::new(["yes", "a: b", "plain", "O'Neil"]).expect("class map");
        let yaml = render_manifest(&classes, "./out", "Test");
        let doc = parse_manifest(&yaml, Path::new("data.yaml")).expect("parse");

        assert_eq!(doc.path.as_deref(), Some("./out"));
        assert_eq!(doc.split_path(SplitKind::Val), Some("val/images"));
        assert_eq!(doc.nc, Some(4));
        assert_eq!(
            doc.names,
            vec![
                Some("yes".to_string()),
                Some("a: b".to_string()),
                Some("plain".to_string()),
                Some("O'Neil".to_string()),
            ]
        );
    }

    #[test]
    fn parse_accepts_sequence_names_and_reports_gaps() {
        let doc = parse_manifest("names:\n  - cat\n  - dog\n", Path::new("a.yaml")).expect("seq");
        assert_eq!(doc.names.len(), 2);
        assert_eq!(doc.nc, None);

        let doc =
            parse_manifest("names:\n  0: cat\n  2: dog\n", Path::new("b.yaml")).expect("mapping");
        assert_eq!(
            doc.names,
            vec![Some("cat".to_string()), None, Some("dog".to_string())]
        );
    }

    #[test]
    fn parse_rejects_out_of_range_class_ids() {
        for key in ["18446744073709551615", "1000000000000"] {
            let yaml = format!("nc: 1\nnames:\n  {key}: x\n");
            let err = parse_manifest(&yaml, Path::new("huge.yaml")).unwrap_err();
            assert!(
                matches!(err, PrepError::ManifestInvalid { .. }),
                "unexpected error for key {key}: {err:?}"
            );
        }
    }

    #[test]
    fn parse_keeps_small_gaps_for_reporting() {
        let doc =
            parse_manifest("names:\n  0: a\n  40: b\n", Path::new("gap.yaml")).expect("parse");
        assert_eq!(doc.names.len(), 41);
        assert!(doc.names[1..40].iter().all(Option::is_none));
    }

    #[test]
    fn parse_rejects_malformed_yaml() {
        let err = parse_manifest("names: [unclosed\n", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, PrepError::ManifestParse { .. }));
    }

    #[test]
    fn write_overwrites_previous_manifest() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join(MANIFEST_FILE), "stale").expect("seed manifest");

        let path = write_manifest(temp.path(), &ClassMap::default(), "./x", "X").expect("write");
        let text = fs::read_to_string(path).expect("read manifest");
        assert!(text.starts_with("# Dataset: X\n"));
        assert!(!text.contains("stale"));
    }
}
