use crate::foundation::error::{GbufError, GbufResult};
use crate::record::codec;
use crate::record::order::ByteOrder;
use crate::record::{Opcode, Record};

/// One record together with where it was found and its timestamp prefix.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Byte offset of the record (including its timestamp prefix).
    pub offset: usize,
    /// Milliseconds since timestamps were enabled, when the record carried a prefix.
    pub stamp: Option<i32>,
    /// The decoded record.
    pub record: Record,
}

/// Sequential decoder over a complete log.
///
/// Every decode pass owns its own byte-order and timestamp state: a header whose version sentinel
/// only matches after swapping bytes switches this reader (and nothing else) into flip mode.
/// Iteration stops after the first error.
#[derive(Debug)]
pub struct RecordReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    order: ByteOrder,
    stamping: bool,
    done: bool,
}

impl<'a> RecordReader<'a> {
    /// Start decoding at the beginning of `bytes`.
    ///
    /// Records before the first header are read in native byte order.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            order: ByteOrder::native(),
            stamping: false,
            done: false,
        }
    }

    /// Byte order currently applied to fields.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// `true` when fields are being byte-swapped relative to this machine.
    pub fn flip_mode(&self) -> bool {
        self.order != ByteOrder::native()
    }

    /// `true` while records carry timestamp prefixes.
    pub fn stamping(&self) -> bool {
        self.stamping
    }

    /// Offset of the next record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn next_event(&mut self) -> GbufResult<Event> {
        let start = self.offset;
        let mut at = start;

        let stamp = if self.stamping {
            let s = codec::read_stamp(self.bytes, at, self.order)?;
            at += 4;
            Some(s)
        } else {
            None
        };

        if self.bytes.get(at) == Some(&(Opcode::Header as u8)) {
            let raw = codec::peek_version(self.bytes, at)?;
            let order = ByteOrder::detect(self.order, raw).ok_or(GbufError::UnsupportedVersion {
                offset: at,
                bits: self.order.u32_from(raw),
            })?;
            if order != self.order {
                tracing::debug!(offset = at, ?order, "header sentinel matched after byte swap");
            }
            self.order = order;
        }

        let (record, next) = codec::decode(self.bytes, at, self.order)?;
        self.stamping = stamping_after(&record, self.stamping);
        self.offset = next;

        Ok(Event {
            offset: start,
            stamp,
            record,
        })
    }
}

impl Iterator for RecordReader<'_> {
    type Item = GbufResult<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.bytes.len() {
            return None;
        }
        let res = self.next_event();
        if res.is_err() {
            self.done = true;
        }
        Some(res)
    }
}

impl std::iter::FusedIterator for RecordReader<'_> {}

/// Timestamp mode in effect after `rec`, given the mode before it.
///
/// A header starts a fresh log with prefixes off.
pub(crate) fn stamping_after(rec: &Record, before: bool) -> bool {
    match rec {
        Record::Header { .. } => false,
        Record::Timestamp(v) => *v != 0,
        _ => before,
    }
}

/// Decode a whole log, failing on the first bad record.
pub fn decode_all(bytes: &[u8]) -> GbufResult<Vec<Event>> {
    RecordReader::new(bytes).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/record/reader.rs"]
mod tests;
