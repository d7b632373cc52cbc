//! Packing classified points into migration payloads.
//!
//! # Transfer buffer layout
//! A [`TransferBuffer`] has `num_points + 1` rows of [`RECORD_WIDTH`] doubles:
//!
//! | row                         | contents                          |
//! |-----------------------------|-----------------------------------|
//! | `0`                         | `(n_prev, n_next, 0)`             |
//! | `1 ..= n_prev`              | `(x, y, index)` bound for `rank-1` |
//! | `n_prev+1 ..= n_prev+n_next`| `(x, y, index)` bound for `rank+1` |
//! | remaining                   | `(-1, -1, -1)`                     |
//!
//! Within each group records appear in increasing point index. Consumers
//! truncate to the live records with [`TransferBuffer::live_rows`] or decode
//! with [`TransferBuffer::to_plan`].

use serde::{Deserialize, Serialize};

use crate::algs::classify::Classification;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshMigrationError;
use crate::partitioning::Direction;

/// Fields per record (and per header row).
pub const RECORD_WIDTH: usize = 3;
/// Fill value of unused rows.
pub const SENTINEL: f64 = -1.0;

/// One exported point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub point: [f64; 2],
    /// Index of the point in the sending partition.
    pub index: usize,
}

impl ExportRecord {
    #[inline]
    fn to_row(self) -> [f64; RECORD_WIDTH] {
        [self.point[0], self.point[1], self.index as f64]
    }
}

/// Points leaving a partition, split by destination.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub previous: Vec<ExportRecord>,
    pub next: Vec<ExportRecord>,
}

impl MigrationPlan {
    /// Collect exported points in increasing point index, previous group
    /// first.
    pub fn from_classification(points: &[[f64; 2]], cls: &Classification<Direction>) -> Self {
        let group = |dir| {
            cls.points_with(dir)
                .map(|iv| ExportRecord {
                    point: points[iv],
                    index: iv,
                })
                .collect::<Vec<_>>()
        };
        Self {
            previous: group(Direction::Previous),
            next: group(Direction::Next),
        }
    }

    /// Records bound in `dir`.
    pub fn get(&self, dir: Direction) -> &[ExportRecord] {
        match dir {
            Direction::Previous => &self.previous,
            Direction::Next => &self.next,
        }
    }

    /// Total exported points.
    pub fn len(&self) -> usize {
        self.previous.len() + self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pack into the legacy layout sized for `num_points` points.
    ///
    /// Fails if the plan holds more records than `num_points`, a record index
    /// is outside `[0, num_points)`, or a point appears twice.
    pub fn to_transfer_buffer(&self, num_points: usize) -> Result<TransferBuffer, MeshMigrationError> {
        if self.len() > num_points {
            return Err(MeshMigrationError::MalformedTransferBuffer(format!(
                "{} records do not fit a buffer for {num_points} points",
                self.len()
            )));
        }
        let mut rows = vec![[SENTINEL; RECORD_WIDTH]; num_points + 1];
        rows[0] = [self.previous.len() as f64, self.next.len() as f64, 0.0];
        for (slot, rec) in self.previous.iter().chain(&self.next).enumerate() {
            rows[1 + slot] = rec.to_row();
        }
        let buf = TransferBuffer { rows };
        buf.validate_invariants()?;
        Ok(buf)
    }
}

/// Rectangular `(num_points + 1) x 3` migration payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferBuffer {
    rows: Vec<[f64; RECORD_WIDTH]>,
}

impl TransferBuffer {
    /// Pack a strip classification of `points`.
    pub fn pack(
        points: &[[f64; 2]],
        cls: &Classification<Direction>,
    ) -> Result<Self, MeshMigrationError> {
        if cls.len() != points.len() {
            return Err(MeshMigrationError::BufferSizeMismatch {
                buffer: "classification",
                expected: points.len(),
                found: cls.len(),
            });
        }
        MigrationPlan::from_classification(points, cls).to_transfer_buffer(points.len())
    }

    /// Wrap row-major data; the length must be a non-zero multiple of 3.
    /// The layout itself is checked by [`to_plan`](Self::to_plan).
    pub fn from_flat(flat: &[f64]) -> Result<Self, MeshMigrationError> {
        if flat.is_empty() || flat.len() % RECORD_WIDTH != 0 {
            return Err(MeshMigrationError::BufferSizeMismatch {
                buffer: "transfer_buffer",
                expected: (flat.len() / RECORD_WIDTH).max(1) * RECORD_WIDTH,
                found: flat.len(),
            });
        }
        let rows = flat
            .chunks_exact(RECORD_WIDTH)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Ok(Self { rows })
    }

    /// All rows including header and sentinel rows.
    pub fn rows(&self) -> &[[f64; RECORD_WIDTH]] {
        &self.rows
    }

    /// Row-major view, `rows().len() * 3` values.
    pub fn as_flat(&self) -> &[f64] {
        self.rows.as_flattened()
    }

    /// Points the buffer was sized for.
    pub fn capacity(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Raw header row; a sentinel row if the buffer is empty.
    pub fn header(&self) -> [f64; RECORD_WIDTH] {
        self.rows.first().copied().unwrap_or([SENTINEL; RECORD_WIDTH])
    }

    /// `(n_prev, n_next)` decoded from the header.
    pub fn counts(&self) -> Result<(usize, usize), MeshMigrationError> {
        let [p, n, reserved] = self.header();
        let n_prev = as_count(p, "n_prev")?;
        let n_next = as_count(n, "n_next")?;
        if reserved != 0.0 {
            return Err(MeshMigrationError::MalformedTransferBuffer(format!(
                "reserved header field is {reserved}, expected 0"
            )));
        }
        if n_prev + n_next > self.capacity() {
            return Err(MeshMigrationError::MalformedTransferBuffer(format!(
                "header claims {} records but only {} rows follow",
                n_prev + n_next,
                self.capacity()
            )));
        }
        Ok((n_prev, n_next))
    }

    /// Data rows of both groups, header and sentinel rows stripped.
    pub fn live_rows(&self) -> Result<&[[f64; RECORD_WIDTH]], MeshMigrationError> {
        let (n_prev, n_next) = self.counts()?;
        Ok(&self.rows[1..1 + n_prev + n_next])
    }

    /// Decode into a [`MigrationPlan`].
    pub fn to_plan(&self) -> Result<MigrationPlan, MeshMigrationError> {
        let (n_prev, _) = self.counts()?;
        let mut records = self
            .live_rows()?
            .iter()
            .map(|row| {
                Ok(ExportRecord {
                    point: [row[0], row[1]],
                    index: as_index(row[2], self.capacity())?,
                })
            })
            .collect::<Result<Vec<_>, MeshMigrationError>>()?;
        let next = records.split_off(n_prev);
        Ok(MigrationPlan {
            previous: records,
            next,
        })
    }
}

impl DebugInvariants for TransferBuffer {
    fn validate_invariants(&self) -> Result<(), MeshMigrationError> {
        if self.rows.is_empty() {
            return Err(MeshMigrationError::MalformedTransferBuffer(
                "missing header row".into(),
            ));
        }
        let (n_prev, n_next) = self.counts()?;
        let live = n_prev + n_next;
        let mut seen = vec![false; self.capacity()];
        for row in &self.rows[1..1 + live] {
            let iv = as_index(row[2], self.capacity())?;
            if std::mem::replace(&mut seen[iv], true) {
                return Err(MeshMigrationError::MalformedTransferBuffer(format!(
                    "point {iv} exported twice"
                )));
            }
        }
        if let Some(pos) = self.rows[1 + live..]
            .iter()
            .position(|r| *r != [SENTINEL; RECORD_WIDTH])
        {
            return Err(MeshMigrationError::MalformedTransferBuffer(format!(
                "row {} past the live records is not a sentinel row",
                1 + live + pos
            )));
        }
        Ok(())
    }
}

fn as_count(v: f64, field: &str) -> Result<usize, MeshMigrationError> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
        Ok(v as usize)
    } else {
        Err(MeshMigrationError::MalformedTransferBuffer(format!(
            "header field {field} = {v} is not a count"
        )))
    }
}

fn as_index(v: f64, num_points: usize) -> Result<usize, MeshMigrationError> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && (v as usize) < num_points {
        Ok(v as usize)
    } else {
        Err(MeshMigrationError::MalformedTransferBuffer(format!(
            "record index {v} outside [0, {num_points})"
        )))
    }
}
