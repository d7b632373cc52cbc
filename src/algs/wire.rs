//! Fixed, versioned, little-endian wire format for transfer buffers.
//!
//! Layout: [`WireHdr`] (8 bytes), [`WireCount`] (8 bytes, row count), then
//! one [`WireRow`] (24 bytes) per buffer row. Doubles travel as their IEEE-754
//! bit patterns, so sentinel rows and header counts survive bit-exactly.

use bytemuck::{Pod, Zeroable};
use std::mem::size_of;

use crate::algs::pack::{RECORD_WIDTH, TransferBuffer};
use crate::mesh_error::MeshMigrationError;

/// Bump when the layout or semantics change in incompatible ways.
pub const WIRE_VERSION: u16 = 1;
/// `kind` tag of a transfer-buffer payload.
pub const KIND_TRANSFER_BUFFER: u16 = 1;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireHdr {
    pub version_le: u16,
    pub kind_le: u16,
    pub reserved_le: u32, // keep zero
}

impl WireHdr {
    pub fn new(kind: u16) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            kind_le: kind.to_le(),
            reserved_le: 0,
        }
    }
    pub fn kind(&self) -> u16 {
        u16::from_le(self.kind_le)
    }
    pub fn version(&self) -> u16 {
        u16::from_le(self.version_le)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u64,
}

impl WireCount {
    pub fn new(n: usize) -> Self {
        Self {
            n_le: (n as u64).to_le(),
        }
    }
    pub fn get(&self) -> u64 {
        u64::from_le(self.n_le)
    }
}

/// One `(x, y, index)` or header row.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireRow {
    pub fields_le: [u64; RECORD_WIDTH],
}

impl WireRow {
    pub fn of(row: [f64; RECORD_WIDTH]) -> Self {
        Self {
            fields_le: row.map(|v| v.to_bits().to_le()),
        }
    }
    pub fn get(&self) -> [f64; RECORD_WIDTH] {
        self.fields_le.map(|b| f64::from_bits(u64::from_le(b)))
    }
}

const HDR_BYTES: usize = size_of::<WireHdr>();
const COUNT_BYTES: usize = size_of::<WireCount>();
const ROW_BYTES: usize = size_of::<WireRow>();

const _: () = {
    assert!(HDR_BYTES == 8);
    assert!(COUNT_BYTES == 8);
    assert!(ROW_BYTES == 24);
};

/// Serialize `buf` for shipping to a neighbor rank.
pub fn encode_transfer_buffer(buf: &TransferBuffer) -> Vec<u8> {
    let rows = buf.rows();
    let mut out = Vec::with_capacity(HDR_BYTES + COUNT_BYTES + rows.len() * ROW_BYTES);
    out.extend_from_slice(bytemuck::bytes_of(&WireHdr::new(KIND_TRANSFER_BUFFER)));
    out.extend_from_slice(bytemuck::bytes_of(&WireCount::new(rows.len())));
    for row in rows {
        out.extend_from_slice(bytemuck::bytes_of(&WireRow::of(*row)));
    }
    out
}

/// Inverse of [`encode_transfer_buffer`]. Accepts unaligned input.
pub fn decode_transfer_buffer(bytes: &[u8]) -> Result<TransferBuffer, MeshMigrationError> {
    if bytes.len() < HDR_BYTES + COUNT_BYTES {
        return Err(MeshMigrationError::Wire(format!(
            "payload of {} bytes is shorter than its {}-byte preamble",
            bytes.len(),
            HDR_BYTES + COUNT_BYTES
        )));
    }
    let hdr: WireHdr = bytemuck::pod_read_unaligned(&bytes[..HDR_BYTES]);
    if hdr.version() != WIRE_VERSION {
        return Err(MeshMigrationError::Wire(format!(
            "unsupported wire version {} (expected {WIRE_VERSION})",
            hdr.version()
        )));
    }
    if hdr.kind() != KIND_TRANSFER_BUFFER {
        return Err(MeshMigrationError::Wire(format!(
            "unexpected payload kind {}",
            hdr.kind()
        )));
    }
    let count: WireCount = bytemuck::pod_read_unaligned(&bytes[HDR_BYTES..HDR_BYTES + COUNT_BYTES]);
    let body = &bytes[HDR_BYTES + COUNT_BYTES..];
    expect_exact_len(body.len(), count.get(), ROW_BYTES)?;
    let flat: Vec<f64> = body
        .chunks_exact(ROW_BYTES)
        .flat_map(|c| bytemuck::pod_read_unaligned::<WireRow>(c).get())
        .collect();
    TransferBuffer::from_flat(&flat)
}

fn expect_exact_len(actual: usize, rows: u64, row_bytes: usize) -> Result<(), MeshMigrationError> {
    let expected = usize::try_from(rows)
        .ok()
        .and_then(|r| r.checked_mul(row_bytes));
    if expected == Some(actual) {
        Ok(())
    } else {
        Err(MeshMigrationError::Wire(format!(
            "expected {rows} rows of {row_bytes} bytes, got {actual} bytes"
        )))
    }
}
