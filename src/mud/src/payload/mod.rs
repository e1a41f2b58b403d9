//! The catalogue — concrete Section payload types (spec.md §6), each a
//! uniform client of the dispatch engine in `registry.rs`/`section.rs`.

mod comment;
mod hist_header;
mod ind_var;
pub mod packing;
mod run_desc;
mod scaler;

pub use comment::Comment;
pub use hist_header::HistHeader;
pub use ind_var::{IndVar, IndVarArray};
pub use run_desc::{RunDesc, TriTiRunDesc};
pub use scaler::Scaler;

use crate::buffer::{ByteReader, ByteWriter};
use crate::error::Result;

/// The five spec.md §4.C Ops, minus `free` (Rust's ownership releases
/// payload storage when a `Section` is dropped, so there is nothing a
/// `free` method would need to do beyond what `Drop` already does) and
/// `new` (the registry allocates a zeroed payload by calling
/// `Default::default()`, so catalogue types also implement `Default`).
pub trait SectionPayload: Sized + Default {
    /// Consume payload bytes from `reader` into a fresh value.
    fn decode(reader: &mut ByteReader) -> Result<Self>;
    /// Emit this value's payload bytes.
    fn encode(&self, writer: &mut ByteWriter);
    /// Payload byte count if encoded right now.
    fn size(&self) -> u32;
    /// A human-readable dump. Format is not part of the format's contract;
    /// nothing depends on its exact text.
    fn describe(&self) -> String;
}

/// A single `f64`, attached to a histogram header when `fsPerBin` cannot
/// represent the exact bin interval (spec.md §6's bin-time invariant).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SecondsPerBin(pub f64);

impl SectionPayload for SecondsPerBin {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        Ok(SecondsPerBin(reader.read_f64()?))
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_f64(self.0);
    }

    fn size(&self) -> u32 {
        8
    }

    fn describe(&self) -> String {
        format!("secondsPerBin = {}", self.0)
    }
}
