use crate::foundation::core::{Pt, Quad};
use crate::foundation::error::{GbufError, GbufResult};
use crate::record::order::ByteOrder;
use crate::record::{OpClass, Opcode, Record};

/// Append the encoding of `rec` to `out`.
///
/// Text-class strings are written with a terminating NUL that is counted in the declared length.
/// Decoding drops only that final NUL, so interior NUL bytes survive.
pub fn encode(rec: &Record, order: ByteOrder, out: &mut Vec<u8>) {
    out.push(rec.opcode() as u8);
    let f = |out: &mut Vec<u8>, v: f32| out.extend_from_slice(&order.f32_bytes(v));
    let i = |out: &mut Vec<u8>, v: i32| out.extend_from_slice(&order.i32_bytes(v));

    match rec {
        Record::Header {
            version,
            width,
            height,
        } => {
            f(out, *version);
            f(out, *width);
            f(out, *height);
        }
        Record::MoveTo(p) | Record::LineTo(p) | Record::Point(p) => {
            f(out, p.x);
            f(out, p.y);
        }
        Record::Line(q)
        | Record::Clip(q)
        | Record::Circle(q)
        | Record::FilledRect(q)
        | Record::Image(q) => {
            f(out, q.x0);
            f(out, q.y0);
            f(out, q.x1);
            f(out, q.y1);
        }
        Record::Color(v)
        | Record::Background(v)
        | Record::LineStyle(v)
        | Record::LineWidth(v)
        | Record::Orientation(v)
        | Record::Justification(v)
        | Record::Group(v)
        | Record::Save(v)
        | Record::Timestamp(v) => i(out, *v),
        Record::Font { size, name } => {
            f(out, *size);
            f(out, 0.0);
            put_string(out, order, name);
        }
        Record::Text { x, y, text } | Record::PsRef { x, y, text } => {
            f(out, *x);
            f(out, *y);
            put_string(out, order, text);
        }
        Record::Poly(values) | Record::FilledPoly(values) => {
            i(out, values.len() as i32);
            for v in values {
                f(out, *v);
            }
        }
    }
}

/// Encode a single record into a fresh vector.
pub fn encode_to_vec(rec: &Record, order: ByteOrder) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(rec));
    encode(rec, order, &mut out);
    out
}

/// Number of bytes [`encode`] writes for `rec`.
pub fn encoded_len(rec: &Record) -> usize {
    let trailing = match rec {
        Record::Font { name: s, .. } | Record::Text { text: s, .. } | Record::PsRef { text: s, .. } => {
            s.len() + 1
        }
        Record::Poly(v) | Record::FilledPoly(v) => v.len() * 4,
        _ => 0,
    };
    1 + rec.opcode().class().fixed_size() + trailing
}

fn put_string(out: &mut Vec<u8>, order: ByteOrder, s: &str) {
    out.extend_from_slice(&order.i32_bytes(s.len() as i32 + 1));
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

/// Decode the record starting at `offset`.
///
/// Returns the record and the offset just past it.
pub fn decode(bytes: &[u8], offset: usize, order: ByteOrder) -> GbufResult<(Record, usize)> {
    let tag = *bytes.get(offset).ok_or(GbufError::Truncated {
        offset,
        needed: 1,
        available: 0,
    })?;
    let op = Opcode::from_u8(tag).ok_or(GbufError::UnknownOpcode {
        offset,
        opcode: tag,
    })?;

    let class = op.class();
    let mut cur = FieldCursor {
        bytes,
        pos: offset + 1,
        order,
    };
    cur.require(offset, class.fixed_size())?;

    let rec = match class {
        OpClass::Header => Record::Header {
            version: cur.f32(),
            width: cur.f32(),
            height: cur.f32(),
        },
        OpClass::Point => {
            let p = Pt::new(cur.f32(), cur.f32());
            match op {
                Opcode::MoveTo => Record::MoveTo(p),
                Opcode::LineTo => Record::LineTo(p),
                _ => Record::Point(p),
            }
        }
        OpClass::Line => {
            let q = Quad::new(cur.f32(), cur.f32(), cur.f32(), cur.f32());
            match op {
                Opcode::Line => Record::Line(q),
                Opcode::Clip => Record::Clip(q),
                Opcode::Circle => Record::Circle(q),
                Opcode::FilledRect => Record::FilledRect(q),
                _ => Record::Image(q),
            }
        }
        OpClass::Attr => {
            let v = cur.i32();
            match op {
                Opcode::Color => Record::Color(v),
                Opcode::Background => Record::Background(v),
                Opcode::LineStyle => Record::LineStyle(v),
                Opcode::LineWidth => Record::LineWidth(v),
                Opcode::Orientation => Record::Orientation(v),
                Opcode::Justification => Record::Justification(v),
                Opcode::Group => Record::Group(v),
                Opcode::Save => Record::Save(v),
                _ => Record::Timestamp(v),
            }
        }
        OpClass::Text => {
            let x = cur.f32();
            let y = cur.f32();
            let len = cur.i32();
            let text = cur.string(offset, len)?;
            match op {
                Opcode::Font => Record::Font { size: x, name: text },
                Opcode::Text => Record::Text { x, y, text },
                _ => Record::PsRef { x, y, text },
            }
        }
        OpClass::PointList => {
            let count = cur.i32();
            let n = cur.trailing_len(offset, count, 4)?;
            let values = (0..n).map(|_| cur.f32()).collect();
            match op {
                Opcode::Poly => Record::Poly(values),
                _ => Record::FilledPoly(values),
            }
        }
    };

    Ok((rec, cur.pos))
}

/// Read the raw bytes of a header's version field without interpreting them.
pub(crate) fn peek_version(bytes: &[u8], offset: usize) -> GbufResult<[u8; 4]> {
    let start = offset + 1;
    bytes
        .get(start..start + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or(GbufError::Truncated {
            offset,
            needed: 1 + OpClass::Header.fixed_size(),
            available: bytes.len().saturating_sub(offset),
        })
}

/// Read a timestamp prefix.
pub(crate) fn read_stamp(bytes: &[u8], offset: usize, order: ByteOrder) -> GbufResult<i32> {
    let mut cur = FieldCursor {
        bytes,
        pos: offset,
        order,
    };
    cur.require(offset, 4)?;
    Ok(cur.i32())
}

struct FieldCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl FieldCursor<'_> {
    fn require(&self, record_offset: usize, n: usize) -> GbufResult<()> {
        let available = self.bytes.len().saturating_sub(self.pos);
        if available < n {
            return Err(GbufError::Truncated {
                offset: record_offset,
                needed: n,
                available,
            });
        }
        Ok(())
    }

    // Callers must `require` first.
    fn word(&mut self) -> [u8; 4] {
        let mut w = [0u8; 4];
        w.copy_from_slice(&self.bytes[self.pos..self.pos + 4]);
        self.pos += 4;
        w
    }

    fn f32(&mut self) -> f32 {
        let w = self.word();
        self.order.f32_from(w)
    }

    fn i32(&mut self) -> i32 {
        let w = self.word();
        self.order.i32_from(w)
    }

    fn trailing_len(&self, record_offset: usize, declared: i32, unit: usize) -> GbufResult<usize> {
        let available = self.bytes.len().saturating_sub(self.pos);
        let Ok(n) = usize::try_from(declared) else {
            return Err(GbufError::Truncated {
                offset: record_offset,
                needed: 0,
                available,
            });
        };
        let needed = n.checked_mul(unit).unwrap_or(usize::MAX);
        self.require(record_offset, needed)?;
        Ok(n)
    }

    fn string(&mut self, record_offset: usize, declared: i32) -> GbufResult<String> {
        let n = self.trailing_len(record_offset, declared, 1)?;
        let raw = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        let text = raw.strip_suffix(b"\0").unwrap_or(raw);
        Ok(String::from_utf8_lossy(text).into_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/codec.rs"]
mod tests;
