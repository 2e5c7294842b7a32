//! Stroke construction: a left-to-right state machine over fractals.
//!
//! State is the current anchor (candidate stroke start) plus the emitted
//! strokes. For each fractal `f` after the first:
//!
//! - Same kind as the anchor: if `f` is at least as extreme, it becomes the
//!   anchor, and if the last stroke ended at the old anchor that stroke is
//!   rewritten to end at `f`. Otherwise `f` is discarded.
//! - Opposite kind: `f` ends a stroke when it is at least `min_span`
//!   standard candles away and its high and low both sit strictly on the
//!   far side of the anchor's. The stroke is emitted and `f` becomes the
//!   anchor. Otherwise `f` is discarded and the anchor stays.
//!
//! The last stroke is the only emitted output ever rewritten, and only by
//! replacing the slot at the last index.

use log::{debug, trace};

use crate::domain::{Fractal, FractalKind, Stroke};

/// Minimum standard-index distance between stroke endpoints: at least three
/// independent standard candles strictly between them.
pub const DEFAULT_MIN_STROKE_SPAN: usize = 4;

/// Why a fractal was discarded without moving the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// Same kind as the anchor but less extreme.
    NotMoreExtreme,
    /// Opposite kind but closer than the minimum span.
    TooClose { span: usize },
    /// Opposite kind, far enough, but the prices do not move past the anchor.
    ValueMismatch,
}

/// What a single `push` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// First fractal: became the anchor.
    Seeded,
    /// Replaced the anchor; `rewrote_last` if the last stroke was moved too.
    Extended { rewrote_last: bool },
    /// Emitted a new stroke ending at this fractal.
    Emitted,
    Discarded(Discard),
}

#[derive(Debug, Clone)]
pub struct StrokeBuilder {
    min_span: usize,
    anchor: Option<Fractal>,
    strokes: Vec<Stroke>,
}

impl Default for StrokeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_STROKE_SPAN)
    }
}

impl StrokeBuilder {
    pub fn new(min_span: usize) -> Self {
        Self {
            min_span,
            anchor: None,
            strokes: Vec::new(),
        }
    }

    pub fn anchor(&self) -> Option<&Fractal> {
        self.anchor.as_ref()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Feed the next fractal. Fractals must arrive in index order.
    pub fn push(&mut self, fractal: Fractal) -> Step {
        let Some(anchor) = self.anchor else {
            self.anchor = Some(fractal);
            return Step::Seeded;
        };

        let step = if fractal.kind == anchor.kind {
            self.extend(anchor, fractal)
        } else {
            self.terminate(anchor, fractal)
        };
        trace!(
            "stroke builder: {} at {} -> {:?}",
            fractal.kind,
            fractal.index,
            step
        );
        step
    }

    /// Consume the builder. The final anchor starts no stroke.
    pub fn finish(self) -> Vec<Stroke> {
        self.strokes
    }

    fn extend(&mut self, anchor: Fractal, fractal: Fractal) -> Step {
        if !anchor.is_superseded_by(&fractal) {
            return Step::Discarded(Discard::NotMoreExtreme);
        }
        self.anchor = Some(fractal);

        let mut rewrote_last = false;
        if let Some(last) = self.strokes.last_mut() {
            if last.end.index == anchor.index {
                *last = Stroke::new(last.start, fractal);
                rewrote_last = true;
            }
        }
        Step::Extended { rewrote_last }
    }

    fn terminate(&mut self, anchor: Fractal, fractal: Fractal) -> Step {
        let span = fractal.index.saturating_sub(anchor.index);
        if span < self.min_span {
            return Step::Discarded(Discard::TooClose { span });
        }

        let moves_past = match anchor.kind {
            FractalKind::Top => anchor.high > fractal.high && anchor.low > fractal.low,
            FractalKind::Bottom => anchor.low < fractal.low && anchor.high < fractal.high,
        };
        if !moves_past {
            return Step::Discarded(Discard::ValueMismatch);
        }

        self.strokes.push(Stroke::new(anchor, fractal));
        self.anchor = Some(fractal);
        Step::Emitted
    }
}

/// Build strokes from an ordered fractal list in a single forward pass.
pub fn build_strokes(fractals: &[Fractal], min_span: usize) -> Vec<Stroke> {
    let mut builder = StrokeBuilder::new(min_span);
    for fractal in fractals {
        builder.push(*fractal);
    }
    let strokes = builder.finish();
    debug!(
        "stroke construction: {} fractals -> {} strokes",
        fractals.len(),
        strokes.len()
    );
    strokes
}
