//! Preparation report for console and JSON output.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::scan::ClassCount;
use crate::split::SplitKind;

/// Summary of a completed preparation run.
#[derive(Clone, Debug, Serialize)]
pub struct PrepareReport {
    pub raw_root: PathBuf,
    pub output_root: PathBuf,
    /// Path of the written `data.yaml`.
    pub manifest: PathBuf,
    /// Number of images across all classes.
    pub total: usize,
    /// Per-class image counts, in ID order.
    pub classes: Vec<ClassCount>,
    /// Per-split counts, in train, val, test order.
    pub splits: Vec<SplitReport>,
}

/// What one split received.
#[derive(Clone, Debug, Serialize)]
pub struct SplitReport {
    pub split: SplitKind,
    pub images: usize,
    /// First few `(destination file name, class id)` pairs.
    pub preview: Vec<(String, usize)>,
}

impl PrepareReport {
    /// Images assigned to one split.
    pub fn split_count(&self, kind: SplitKind) -> usize {
        self.splits
            .iter()
            .find(|s| s.split == kind)
            .map(|s| s.images)
            .unwrap_or(0)
    }
}

impl fmt::Display for PrepareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in &self.classes {
            writeln!(f, "{}: {} images", class.name, class.images)?;
        }
        writeln!(f)?;
        writeln!(f, "Total: {} images", self.total)?;

        for split in &self.splits {
            writeln!(f)?;
            writeln!(
                f,
                "{} ({} images):",
                split.split.as_str().to_uppercase(),
                split.images
            )?;
            for (name, class_id) in &split.preview {
                writeln!(f, "  {} -> class ID {}", name, class_id)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Manifest written to {}", self.manifest.display())?;
        writeln!(f, "Dataset prepared in {}", self.output_root.display())?;
        writeln!(f)?;
        writeln!(f, "Next steps:")?;
        writeln!(
            f,
            "  1. Annotate the images with a labelling tool (LabelImg, Roboflow, ...)"
        )?;
        writeln!(f, "  2. Export the annotations in YOLO format")?;
        writeln!(f, "  3. Put the .txt files in the matching labels/ folders")?;
        writeln!(f)?;
        writeln!(f, "Classes:")?;
        for class in &self.classes {
            writeln!(f, "  {}: ID {}", class.name, class.id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> PrepareReport {
        PrepareReport {
            raw_root: PathBuf::from("data/raw"),
            output_root: PathBuf::from("data/processed"),
            manifest: PathBuf::from("data/processed/data.yaml"),
            total: 3,
            classes: vec![
                ClassCount {
                    id: 0,
                    name: "Fito".to_string(),
                    images: 2,
                },
                ClassCount {
                    id: 1,
                    name: "Sana".to_string(),
                    images: 1,
                },
            ],
            splits: vec![
                SplitReport {
                    split: SplitKind::Train,
                    images: 2,
                    preview: vec![("Fito_a.jpg".to_string(), 0), ("Sana_c.jpg".to_string(), 1)],
                },
                SplitReport {
                    split: SplitKind::Val,
                    images: 1,
                    preview: vec![("Fito_b.jpg".to_string(), 0)],
                },
                SplitReport {
                    split: SplitKind::Test,
                    images: 0,
                    preview: vec![],
                },
            ],
        }
    }

    #[test]
    fn display_lists_counts_and_previews() {
        let text = sample_report().to_string();
        assert!(text.contains("Fito: 2 images"));
        assert!(text.contains("Total: 3 images"));
        assert!(text.contains("TRAIN (2 images):"));
        assert!(text.contains("  Sana_c.jpg -> class ID 1"));
        assert!(text.contains("TEST (0 images):"));
        assert!(text.contains("  Sana: ID 1"));
    }

    #[test]
    fn json_uses_lowercase_split_names() {
        let json = serde_json::to_value(sample_report()).expect("serialize");
        assert_eq!(json["splits"][1]["split"], "val");
        assert_eq!(json["classes"][0]["name"], "Fito");
        assert_eq!(json["total"], 3);
    }

    #[test]
    fn split_count_looks_up_by_kind() {
        let report = sample_report();
        assert_eq!(report.split_count(SplitKind::Val), 1);
        assert_eq!(report.split_count(SplitKind::Test), 0);
    }
}
