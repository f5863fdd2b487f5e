//! Bar-level layout and glyph composition.
//!
//! The renderer turns one bar of the score model into a positioned
//! glyph tree: a pre-beat decoration group (clefs, signatures), one
//! voice container per rendered voice holding the per-beat glyph
//! sub-trees, and a post-beat decoration group. Renderers drawing the
//! same bar column on parallel staves negotiate consistent spacing
//! through a shared [`BarLayoutingInfo`]; [`BarColumn`] drives the
//! passes in the order that negotiation requires.

mod bar;
mod beaming;
mod bounds;
mod constants;
mod containers;
mod glyphs;
mod layouting;
mod percussion;
mod score;
mod slash;
mod tab;

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::canvas::Canvas;

pub use bar::{BarRenderer, BarRendererBase, BeatXPosition};
pub use beaming::{BarHelpers, BeamingHelper};
pub use bounds::{BarBounds, BeatBounds, Bounds, BoundsLookup, MasterBarBounds};
pub use containers::{BeatContainer, VoiceContainer};
pub use glyphs::{
    notehead_symbol, rest_symbol, Glyph, GlyphGroup, GlyphKind, ScoreChordGlyph, ScoreNoteHead,
    TabChordGlyph, TabNoteEntry,
};
pub use layouting::BarLayoutingInfo;
pub use percussion::PercussionBarRenderer;
pub use score::ScoreBarRenderer;
pub use slash::SlashBarRenderer;
pub use tab::TabBarRenderer;

/// One bar column across the parallel staves of a line.
///
/// Owns the shared layouting info and the renderers that contribute to
/// it, and sequences the render passes so that every renderer registers
/// its sizing needs before any renderer applies the negotiated maxima.
pub struct BarColumn<'a> {
    /// Bar column index within the line.
    pub index: usize,
    layouting_info: Rc<RefCell<BarLayoutingInfo>>,
    renderers: Vec<Box<dyn BarRenderer<'a> + 'a>>,
}

impl<'a> BarColumn<'a> {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            layouting_info: Rc::new(RefCell::new(BarLayoutingInfo::new())),
            renderers: Vec::new(),
        }
    }

    /// Handle to the shared negotiation record, for constructing the
    /// column's renderers.
    pub fn layouting_info(&self) -> Rc<RefCell<BarLayoutingInfo>> {
        self.layouting_info.clone()
    }

    pub fn add_renderer(&mut self, renderer: Box<dyn BarRenderer<'a> + 'a>) {
        self.renderers.push(renderer);
    }

    pub fn renderers(&self) -> &[Box<dyn BarRenderer<'a> + 'a>] {
        &self.renderers
    }

    pub fn renderers_mut(&mut self) -> &mut [Box<dyn BarRenderer<'a> + 'a>] {
        &mut self.renderers
    }

    /// Pass 1: local layout of every renderer.
    pub fn do_layout(&mut self) {
        debug!(
            "bar column {}: local layout of {} renderers",
            self.index,
            self.renderers.len()
        );
        for renderer in &mut self.renderers {
            renderer.do_layout();
        }
    }

    /// Passes 2 and 3: register every renderer's sizing needs, then
    /// apply the negotiated maxima. Returns whether any renderer
    /// performed work; callers re-run the column until it settles.
    pub fn align(&mut self) -> bool {
        for renderer in &mut self.renderers {
            renderer.register_layouting_info();
        }
        let mut any_applied = false;
        for renderer in &mut self.renderers {
            any_applied |= renderer.apply_layouting_info();
        }
        any_applied
    }

    /// Widest renderer of the column after alignment.
    pub fn width(&self) -> f64 {
        self.renderers
            .iter()
            .map(|r| r.base().width)
            .fold(0.0, f64::max)
    }

    /// Pass 4: justify every renderer to the same line width.
    pub fn scale_to_width(&mut self, width: f64) {
        for renderer in &mut self.renderers {
            renderer.scale_to_width(width);
        }
    }

    /// Mark every renderer paint-ready.
    pub fn finalize(&mut self) {
        for renderer in &mut self.renderers {
            renderer.finalize_renderer();
        }
    }

    /// Pass 5: paint every renderer at its own offset.
    pub fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        for renderer in &self.renderers {
            renderer.paint(cx, cy, canvas);
        }
    }

    /// Pass 6: derive the interactive geometry of the column.
    pub fn build_bounds_lookup(&self, lookup: &mut BoundsLookup, cx: f64, cy: f64) {
        let mut master = MasterBarBounds::new(self.index);
        master.is_first_of_line = self
            .renderers
            .first()
            .is_some_and(|r| r.base().is_first_of_line());
        for renderer in &self.renderers {
            renderer.build_boundings_lookup(&mut master, cx, cy);
        }
        lookup.add_master_bar(master);
    }
}
