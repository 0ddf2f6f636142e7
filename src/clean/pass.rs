use crate::buffer::event_buffer::{EventBuffer, RecorderOpts};
use crate::foundation::core::Quad;
use crate::foundation::error::GbufResult;
use crate::record::Record;
use crate::record::reader::{Event, decode_all};

/// Last value emitted for each deduplicated attribute. `None` means nothing emitted yet.
#[derive(Clone, Debug, Default, PartialEq)]
struct Tracked {
    color: Option<i32>,
    background: Option<i32>,
    line_style: Option<i32>,
    line_width: Option<i32>,
    orientation: Option<i32>,
    justification: Option<i32>,
    font: Option<(f32, String)>,
    clip: Option<Quad>,
}

impl Tracked {
    /// Track `rec` and report whether it must be kept.
    fn keep(&mut self, rec: &Record) -> bool {
        match rec {
            Record::Color(v) => changed(&mut self.color, *v),
            Record::Background(v) => changed(&mut self.background, *v),
            Record::LineStyle(v) => changed(&mut self.line_style, *v),
            Record::LineWidth(v) => changed(&mut self.line_width, *v),
            Record::Orientation(v) => changed(&mut self.orientation, *v),
            Record::Justification(v) => changed(&mut self.justification, *v),
            Record::Font { size, name } => changed(&mut self.font, (*size, name.clone())),
            Record::Clip(q) => changed(&mut self.clip, *q),
            _ => true,
        }
    }
}

fn changed<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        return false;
    }
    *slot = Some(value);
    true
}

/// A moveto is dead when, past any state changes, the log ends or moves again.
///
/// Group, save and timestamp records count as real work here, so a moveto before them is kept.
fn moveto_is_live(rest: &[Event]) -> bool {
    rest.iter()
        .map(|ev| &ev.record)
        .find(|rec| !rec.is_state_change())
        .is_some_and(|rec| !matches!(rec, Record::MoveTo(_)))
}

/// Produce a new buffer holding `bytes` without redundant records.
///
/// Redundant means an attribute set to the value it already has (restores of `gsave` are taken
/// into account) or a moveto that no drawing uses. Drawing records are never dropped or
/// reordered, and timestamp prefixes are carried over. The result is written in the byte order
/// of `opts` and has an empty image table.
///
/// Nothing is produced unless the whole input decodes.
#[tracing::instrument(skip_all, fields(len = bytes.len()))]
pub fn clean(bytes: &[u8], opts: RecorderOpts) -> GbufResult<EventBuffer> {
    let events = decode_all(bytes)?;

    let mut out = EventBuffer::blank(opts);
    let mut tracked = Tracked::default();
    let mut saved: Vec<Tracked> = Vec::new();
    let mut dropped = 0usize;

    for (i, ev) in events.iter().enumerate() {
        let keep = match &ev.record {
            Record::MoveTo(_) => moveto_is_live(&events[i + 1..]),
            Record::Save(0) => {
                if let Some(prev) = saved.pop() {
                    tracked = prev;
                }
                true
            }
            Record::Save(_) => {
                saved.push(tracked.clone());
                true
            }
            rec => tracked.keep(rec),
        };
        if keep {
            out.push(&ev.record, ev.stamp)?;
        } else {
            dropped += 1;
        }
    }

    tracing::debug!(
        records = events.len(),
        dropped,
        bytes_after = out.len(),
        "cleaned event log"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/clean/pass.rs"]
mod tests;
