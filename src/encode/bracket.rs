//! Per-encode path bracketing and emitted-attribute tracking.
//!
//! Nothing here is global: each encode call owns its own values.

use crate::context::state::FontSpec;
use crate::foundation::core::Pt;
use crate::record::Record;

/// Kind of path currently open in the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum PathOpen {
    /// No path.
    #[default]
    None,
    /// A run of linetos awaiting a stroke.
    Stroking,
    /// A filled shape awaiting its fill.
    Filling,
}

/// What a backend must do before emitting a record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Step {
    /// Path that must be closed first (`None` when nothing is owed).
    pub(crate) close: PathOpen,
    /// Start of a new stroke path: emit a moveto to this point before the lineto.
    pub(crate) begin: Option<Pt>,
}

/// Path bracketing state machine plus the pen position.
///
/// A run of linetos after one moveto forms a single path; the stroke is owed until any other
/// record arrives or the log ends. Filled rectangles and polygons leave a fill owed the same way.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Bracket {
    open: PathOpen,
    pen: Pt,
}

impl Bracket {
    /// Pen position before the current record.
    pub(crate) fn pen(&self) -> Pt {
        self.pen
    }

    /// Advance over `rec`.
    pub(crate) fn step(&mut self, rec: &Record) -> Step {
        match rec {
            Record::LineTo(p) => {
                let step = if self.open == PathOpen::Stroking {
                    Step::default()
                } else {
                    Step {
                        close: self.open,
                        begin: Some(self.pen),
                    }
                };
                self.open = PathOpen::Stroking;
                self.pen = *p;
                step
            }
            Record::MoveTo(p) | Record::Point(p) => {
                let step = self.close();
                self.pen = *p;
                step
            }
            Record::FilledRect(_) | Record::FilledPoly(_) => {
                let step = self.close();
                self.open = PathOpen::Filling;
                step
            }
            _ => self.close(),
        }
    }

    /// Close whatever is open, e.g. at the end of the log.
    pub(crate) fn close(&mut self) -> Step {
        Step {
            close: std::mem::take(&mut self.open),
            begin: None,
        }
    }
}

/// Attribute values as last emitted to the target. `None` means the target default is unknown.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Emitted {
    pub(crate) color: Option<i32>,
    pub(crate) line_width: Option<i32>,
    pub(crate) line_style: Option<i32>,
    pub(crate) font: Option<FontSpec>,
}

/// Emitted attributes across the target's own save/restore nesting.
///
/// Clip changes open a save level of their own so a later clip can widen the area again: at
/// each save level at most one clip level is open, and it is closed before a new clip, before
/// the enclosing restore and at the end of the log.
#[derive(Debug, Default)]
pub(crate) struct Frames {
    pub(crate) have: Emitted,
    clip: Option<Emitted>,
    saved: Vec<(Emitted, Option<Emitted>)>,
}

impl Frames {
    /// Record a save; the backend emits one save directive.
    pub(crate) fn save(&mut self) {
        self.saved.push((self.have.clone(), self.clip.take()));
    }

    /// Record a restore and return the number of restore directives to emit.
    ///
    /// A restore with nothing saved emits nothing.
    pub(crate) fn restore(&mut self) -> usize {
        let Some((have, clip)) = self.saved.pop() else {
            return 0;
        };
        let n = 1 + usize::from(self.clip.is_some());
        self.have = have;
        self.clip = clip;
        n
    }

    /// Record a clip change and return `true` when a restore directive must precede it.
    ///
    /// The backend then emits one save directive and the clip itself.
    pub(crate) fn clip(&mut self) -> bool {
        let reopen = match self.clip.take() {
            Some(have) => {
                self.have = have;
                true
            }
            None => false,
        };
        self.clip = Some(self.have.clone());
        reopen
    }

    /// Number of restore directives that balance every open level.
    pub(crate) fn unwind(&mut self) -> usize {
        let open = usize::from(self.clip.take().is_some())
            + self
                .saved
                .drain(..)
                .map(|(_, clip)| 1 + usize::from(clip.is_some()))
                .sum::<usize>();
        self.have = Emitted::default();
        open
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/bracket.rs"]
mod tests;
