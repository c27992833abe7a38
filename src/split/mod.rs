//! Seeded train/val/test partitioning.
//!
//! Partitioning runs in two holdout stages: `test_ratio` of the whole set
//! becomes the test split, then `val_ratio` of what remains becomes the
//! validation split. Both stages reseed from the same seed, so membership is
//! a pure function of the input order and the seed.

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::fmt;

use crate::scan::ImageRecord;

/// One of the three output partitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    Train,
    Val,
    Test,
}

impl SplitKind {
    /// All splits in output order.
    pub const ALL: [SplitKind; 3] = [SplitKind::Train, SplitKind::Val, SplitKind::Test];

    /// Directory name of the split.
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitKind::Train => "train",
            SplitKind::Val => "val",
            SplitKind::Test => "test",
        }
    }
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named partition and its records, in assignment order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Split {
    pub kind: SplitKind,
    pub records: Vec<ImageRecord>,
}

/// The three disjoint splits of a scanned dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Partition {
    splits: Vec<Split>,
}

impl Partition {
    fn new(train: Vec<ImageRecord>, val: Vec<ImageRecord>, test: Vec<ImageRecord>) -> Self {
        Self {
            splits: vec![
                Split {
                    kind: SplitKind::Train,
                    records: train,
                },
                Split {
                    kind: SplitKind::Val,
                    records: val,
                },
                Split {
                    kind: SplitKind::Test,
                    records: test,
                },
            ],
        }
    }

    /// Records of one split.
    pub fn get(&self, kind: SplitKind) -> &[ImageRecord] {
        self.splits
            .iter()
            .find(|split| split.kind == kind)
            .map(|split| split.records.as_slice())
            .unwrap_or(&[])
    }

    /// Splits in train, val, test order.
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }
}

/// Number of items a holdout stage takes from `total` items.
///
/// `ceil(ratio * total)`, capped so at least one item stays on the retained
/// side whenever there is one to keep.
pub fn holdout_count(total: usize, ratio: f64) -> usize {
    if total == 0 {
        return 0;
    }

    let raw = (ratio * total as f64).ceil() as usize;
    raw.min(total - 1)
}

/// Split `items` into `(retained, holdout)` with a seeded permutation.
///
/// The first `holdout_count` positions of the permutation form the holdout;
/// both outputs follow permutation order.
pub fn holdout_split<T>(items: Vec<T>, ratio: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let total = items.len();
    let k = holdout_count(total, ratio);

    let mut order: Vec<usize> = (0..total).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut take = |index: &usize| slots[*index].take();

    let holdout: Vec<T> = order[..k].iter().filter_map(&mut take).collect();
    let retained: Vec<T> = order[k..].iter().filter_map(&mut take).collect();

    (retained, holdout)
}

/// Shuffle records before splitting.
///
/// With no seed the process-wide generator is used, so membership then varies
/// between runs.
pub fn shuffle_records(records: &mut [ImageRecord], seed: Option<u64>) {
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        records.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        records.shuffle(&mut rng);
    }
}

/// Run both holdout stages over already shuffled records.
pub fn partition_records(
    records: Vec<ImageRecord>,
    test_ratio: f64,
    val_ratio: f64,
    seed: u64,
) -> Partition {
    let (train_val, test) = holdout_split(records, test_ratio, seed);
    let (train, val) = holdout_split(train_val, val_ratio, seed);
    Partition::new(train, val, test)
}
