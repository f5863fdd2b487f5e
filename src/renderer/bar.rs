//! Base bar renderer: shared layout state and pass orchestration.
//!
//! A bar renderer lays out one bar on one stave. The base struct owns
//! all shared state (glyph groups, voice containers, sizing, overflow)
//! and the [`BarRenderer`] trait carries the orchestration as default
//! methods; notation variants override only the content-generation
//! hooks (pre-beat, beat, post-beat, background).
//!
//! Lifecycle: `do_layout` rebuilds the glyph tree from the bar's
//! voices, `register_layouting_info` contributes sizing needs to the
//! shared per-column record, `apply_layouting_info` consumes the
//! negotiated maxima (a version-guarded no-op when nothing widened),
//! `scale_to_width` justifies the bar to a line width, and `paint` /
//! `build_boundings_lookup` run on the finalized result.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

use crate::canvas::{Canvas, MusicSymbol};
use crate::model::{Bar, Note, SimileMark, Voice};
use crate::settings::Settings;

use super::beaming::BarHelpers;
use super::bounds::{BarBounds, BeatBounds, Bounds, MasterBarBounds};
use super::constants::*;
use super::containers::{BeatContainer, VoiceContainer};
use super::glyphs::{Glyph, GlyphGroup};
use super::layouting::BarLayoutingInfo;

/// Horizontal reference points within a beat cell, for cursor
/// placement and tie anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatXPosition {
    /// Leading edge of the beat cell.
    PreNotes,
    /// Start of the on-notes glyphs.
    OnNotes,
    /// The beat's tie/slur anchor point.
    MiddleNotes,
    /// End of the on-notes glyphs.
    PostNotes,
    /// Trailing edge of the beat cell.
    EndBeat,
}

/// Shared layout state of one bar on one stave.
pub struct BarRendererBase<'a> {
    /// The bar being rendered; `None` marks a placeholder renderer
    /// whose layout operations are no-ops.
    pub bar: Option<&'a Bar>,
    pub settings: &'a Settings,
    /// Negotiation record shared with every renderer of this bar column.
    pub layouting_info: Rc<RefCell<BarLayoutingInfo>>,
    pub helpers: Option<BarHelpers>,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Position of this renderer within its line (0 = leads the line).
    pub index: usize,

    /// Vertical space the content needs above the stave lines.
    pub top_overflow: f64,
    /// Vertical space the content needs below the stave lines.
    pub bottom_overflow: f64,
    /// Band above the lines inside the renderer height.
    pub top_padding: f64,
    /// Band below the lines inside the renderer height.
    pub bottom_padding: f64,

    /// Whether a glyph (e.g. a vibrato run) links this renderer to the
    /// previous one.
    pub is_linked_to_previous: bool,
    /// Whether this renderer may move to the next line on wrap.
    pub can_wrap: bool,
    pub is_finalized: bool,

    was_first_of_line: bool,
    applied_layouting_info: u64,
    pre_beat_glyphs: GlyphGroup,
    voice_containers: BTreeMap<usize, VoiceContainer<'a>>,
    post_beat_glyphs: GlyphGroup,
}

impl<'a> BarRendererBase<'a> {
    pub fn new(
        bar: Option<&'a Bar>,
        settings: &'a Settings,
        layouting_info: Rc<RefCell<BarLayoutingInfo>>,
    ) -> Self {
        let helpers = bar.map(BarHelpers::new);
        Self {
            bar,
            settings,
            layouting_info,
            helpers,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            index: 0,
            top_overflow: 0.0,
            bottom_overflow: 0.0,
            top_padding: 0.0,
            bottom_padding: 0.0,
            is_linked_to_previous: false,
            can_wrap: true,
            is_finalized: false,
            was_first_of_line: false,
            applied_layouting_info: 0,
            pre_beat_glyphs: GlyphGroup::default(),
            voice_containers: BTreeMap::new(),
            post_beat_glyphs: GlyphGroup::default(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.settings.display.scale
    }

    pub fn is_first_of_line(&self) -> bool {
        self.index == 0
    }

    pub fn was_first_of_line(&self) -> bool {
        self.was_first_of_line
    }

    pub(crate) fn record_line_start(&mut self) {
        self.was_first_of_line = self.is_first_of_line();
    }

    /// Overflow only ever grows within a pass.
    pub fn register_overflow_top(&mut self, overflow: f64) {
        if overflow > self.top_overflow {
            self.top_overflow = overflow;
        }
    }

    pub fn register_overflow_bottom(&mut self, overflow: f64) {
        if overflow > self.bottom_overflow {
            self.bottom_overflow = overflow;
        }
    }

    /// Where the voice containers start, right after the pre-beat block.
    pub fn beat_glyphs_start(&self) -> f64 {
        self.pre_beat_glyphs.x + self.pre_beat_glyphs.width
    }

    pub fn post_beat_glyphs_start(&self) -> f64 {
        self.post_beat_glyphs.x
    }

    pub fn pre_beat_glyphs(&self) -> &GlyphGroup {
        &self.pre_beat_glyphs
    }

    pub fn post_beat_glyphs(&self) -> &GlyphGroup {
        &self.post_beat_glyphs
    }

    /// The primary voice is always materialized, even when empty, to
    /// preserve bar presence.
    fn has_voice_container(voice: &Voice) -> bool {
        !voice.is_empty() || voice.index == 0
    }

    pub fn has_container_for(&self, voice_index: usize) -> bool {
        self.voice_containers.contains_key(&voice_index)
    }

    pub fn voice_container_count(&self) -> usize {
        self.voice_containers.len()
    }

    pub fn voice_container(&self, voice_index: usize) -> Option<&VoiceContainer<'a>> {
        self.voice_containers.get(&voice_index)
    }

    /// Voice containers in voice-index order.
    pub fn voice_containers(&self) -> impl Iterator<Item = &VoiceContainer<'a>> + '_ {
        self.voice_containers.values()
    }

    pub fn get_beat_container(
        &self,
        voice_index: usize,
        beat_index: usize,
    ) -> Option<&BeatContainer<'a>> {
        self.voice_containers
            .get(&voice_index)?
            .beat_glyphs
            .iter()
            .find(|bc| bc.beat.index == beat_index)
    }

    pub(crate) fn begin_layout(&mut self) {
        self.pre_beat_glyphs = GlyphGroup::default();
        self.voice_containers.clear();
        self.post_beat_glyphs = GlyphGroup::default();
        let bar = match self.bar {
            Some(bar) => bar,
            None => return,
        };
        for voice in &bar.voices {
            if Self::has_voice_container(voice) {
                self.voice_containers
                    .insert(voice.index, VoiceContainer::new(voice));
            }
        }
        if bar.simile_mark == SimileMark::SecondOfDouble {
            self.can_wrap = false;
        }
    }

    pub(crate) fn reset_pre_beat_glyphs(&mut self) {
        self.pre_beat_glyphs = GlyphGroup::default();
    }

    pub fn add_pre_beat_glyph(&mut self, glyph: Glyph) {
        self.pre_beat_glyphs.add_glyph(glyph);
    }

    pub fn add_post_beat_glyph(&mut self, glyph: Glyph) {
        self.post_beat_glyphs.add_glyph(glyph);
    }

    /// Wire the beat container to its beaming helper and hand it to the
    /// owning voice container.
    pub fn add_beat_glyph(&mut self, mut container: BeatContainer<'a>) {
        if let Some(helpers) = &self.helpers {
            container.beaming = helpers.helper_for(container.voice_index, container.beat.index);
        }
        if let Some(voice_container) = self.voice_containers.get_mut(&container.voice_index) {
            voice_container.add_glyph(container);
        }
    }

    /// Compute the natural width bottom-up: pre-beat block, then the
    /// widest voice container, then the post-beat block.
    pub(crate) fn update_sizes(&mut self) {
        let scale = self.scale();
        let start = self.beat_glyphs_start();
        let mut post_start = start;
        for container in self.voice_containers.values_mut() {
            container.x = start;
            container.do_layout(scale);
            let end = container.x + container.width;
            if end > post_start {
                post_start = end;
            }
        }
        self.post_beat_glyphs.x = post_start;
        self.width = (self.post_beat_glyphs.x + self.post_beat_glyphs.width).ceil();
    }

    /// Contribute this renderer's sizing needs into the shared record.
    pub fn register_layouting_info(&self) {
        let mut info = self.layouting_info.borrow_mut();
        info.update_pre_beat_size(self.pre_beat_glyphs.width);
        for container in self.voice_containers.values() {
            container.register_layouting_info(&mut info);
        }
        info.update_post_beat_size(self.post_beat_glyphs.width);
    }

    /// Pull the negotiated sizes and reposition the voice containers.
    /// Returns `false` without touching anything when the shared
    /// version matches the one applied last.
    pub fn apply_layouting_info(&mut self) -> bool {
        let version = self.layouting_info.borrow().version;
        if self.applied_layouting_info >= version {
            return false;
        }
        self.applied_layouting_info = version;

        let info = self.layouting_info.borrow();
        self.pre_beat_glyphs.width = info.pre_beat_size;
        let pre_end = self.pre_beat_glyphs.x + self.pre_beat_glyphs.width;
        let mut voice_end = pre_end;
        for container in self.voice_containers.values_mut() {
            container.x = pre_end;
            container.apply_layouting_info(&info);
            let end = container.x + container.width;
            if end > voice_end {
                voice_end = end;
            }
        }
        self.post_beat_glyphs.x = voice_end;
        self.post_beat_glyphs.width = info.post_beat_size;
        self.width = (self.post_beat_glyphs.x + self.post_beat_glyphs.width).ceil();
        trace!(
            "bar {}: applied layouting info v{version}, width {:.1}",
            self.bar.map_or(0, |b| b.index),
            self.width
        );
        true
    }

    /// Stretch or compress only the voice container region to a
    /// justified line width; pre-beat and post-beat decorations keep
    /// their natural size.
    pub fn scale_to_width(&mut self, width: f64) {
        let container_width = width - self.pre_beat_glyphs.width - self.post_beat_glyphs.width;
        for container in self.voice_containers.values_mut() {
            container.scale_to_width(container_width);
        }
        self.post_beat_glyphs.x =
            self.pre_beat_glyphs.x + self.pre_beat_glyphs.width + container_width;
        self.width = width;
    }

    pub fn finalize_renderer(&mut self) {
        self.is_finalized = true;
    }

    /// Horizontal position of a beat within the renderer.
    pub fn get_beat_x(
        &self,
        voice_index: usize,
        beat_index: usize,
        position: BeatXPosition,
    ) -> f64 {
        if let Some(container) = self.voice_containers.get(&voice_index) {
            if let Some(bc) = container
                .beat_glyphs
                .iter()
                .find(|bc| bc.beat.index == beat_index)
            {
                return match position {
                    BeatXPosition::PreNotes => container.x + bc.x,
                    BeatXPosition::OnNotes => container.x + bc.x + bc.on_notes.x,
                    BeatXPosition::MiddleNotes => container.x + bc.x + bc.on_time_x(),
                    BeatXPosition::PostNotes => {
                        container.x + bc.x + bc.on_notes.x + bc.on_notes.width
                    }
                    BeatXPosition::EndBeat => container.x + bc.x + bc.width,
                };
            }
        }
        0.0
    }

    pub(crate) fn paint_contents(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let resources = &self.settings.display.resources;
        canvas.set_color(&resources.main_glyph_color);
        self.pre_beat_glyphs.paint(cx + self.x, cy + self.y, canvas);
        for (voice_index, container) in &self.voice_containers {
            let color = if *voice_index == 0 {
                &resources.main_glyph_color
            } else {
                &resources.secondary_glyph_color
            };
            canvas.set_color(color);
            container.paint(cx + self.x, cy + self.y, canvas);
        }
        canvas.set_color(&resources.main_glyph_color);
        self.post_beat_glyphs.paint(cx + self.x, cy + self.y, canvas);
    }

    pub(crate) fn paint_simile_mark(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let bar = match self.bar {
            Some(bar) => bar,
            None => return,
        };
        let scale = self.scale();
        canvas.set_color(&self.settings.display.resources.main_glyph_color);
        match bar.simile_mark {
            SimileMark::Simple => canvas.fill_music_symbol(
                cx + self.x + (self.width - SIMILE_WIDTH * scale) / 2.0,
                cy + self.y + self.height / 2.0,
                1.0,
                MusicSymbol::SimileMarkSimple,
            ),
            SimileMark::SecondOfDouble => canvas.fill_music_symbol(
                cx + self.x - (SIMILE_DOUBLE_WIDTH * scale) / 2.0,
                cy + self.y + self.height / 2.0,
                1.0,
                MusicSymbol::SimileMarkDouble,
            ),
            _ => {}
        }
    }

    /// Emit one bounds record per rendered beat into the bar column
    /// geometry. A structurally empty bar collapses all its beat
    /// bounds to the renderer's leading edge so it remains clickable
    /// as a single region.
    pub fn build_boundings_lookup(&self, master: &mut MasterBarBounds, cx: f64, cy: f64) {
        let bar = match self.bar {
            Some(bar) => bar,
            None => return,
        };
        let visual = Bounds {
            x: cx + self.x,
            y: cy + self.y + self.top_padding,
            w: self.width,
            h: self.height - self.top_padding - self.bottom_padding,
        };
        let real = Bounds {
            x: cx + self.x,
            y: cy + self.y,
            w: self.width,
            h: self.height,
        };
        let mut bar_bounds = BarBounds {
            bar_index: bar.index,
            visual_bounds: visual,
            real_bounds: real,
            beats: Vec::new(),
        };
        for (voice_index, container) in &self.voice_containers {
            let is_empty_bar = bar.is_empty() && *voice_index == 0;
            if !container.voice.is_empty() || is_empty_bar {
                for bc in &container.beat_glyphs {
                    let mut beat_bounds = BeatBounds {
                        voice_index: *voice_index,
                        beat_index: bc.beat.index,
                        visual_bounds: Bounds {
                            x: cx + self.x + container.x + bc.x + bc.on_notes.x,
                            y: visual.y,
                            w: bc.on_notes.width,
                            h: visual.h,
                        },
                        real_bounds: Bounds {
                            x: cx + self.x + container.x + bc.x,
                            y: real.y,
                            w: bc.width,
                            h: real.h,
                        },
                    };
                    if is_empty_bar {
                        beat_bounds.visual_bounds.x = cx + self.x;
                        beat_bounds.real_bounds.x = beat_bounds.visual_bounds.x;
                    }
                    bar_bounds.add_beat(beat_bounds);
                }
            }
        }
        master.add_bar(bar_bounds);
    }
}

/// Capability set of a bar renderer. The default method bodies carry
/// the shared orchestration; variants override the content-generation
/// hooks only.
pub trait BarRenderer<'a> {
    fn base(&self) -> &BarRendererBase<'a>;
    fn base_mut(&mut self) -> &mut BarRendererBase<'a>;

    /// Build the fixed decorations leading the bar (clefs, signatures).
    /// Overrides must start by calling
    /// [`BarRendererBase::record_line_start`] through `base_mut`.
    fn create_pre_beat_glyphs(&mut self) {
        self.base_mut().record_line_start();
    }

    /// Build the per-voice beat glyphs.
    fn create_beat_glyphs(&mut self) {}

    /// Build the decorations closing the bar.
    fn create_post_beat_glyphs(&mut self) {}

    /// Variant-specific background (staff/string lines). Default: none.
    fn paint_background(&self, _cx: f64, _cy: f64, _canvas: &mut dyn Canvas) {}

    /// Variant-specific decorations painted over the contents (stems,
    /// beams, rhythm notation). Default: none.
    fn paint_decorations(&self, _cx: f64, _cy: f64, _canvas: &mut dyn Canvas) {}

    /// Vertical anchor of a note for ties and cursor placement.
    fn get_note_y(&self, _note: &Note) -> f64 {
        0.0
    }

    /// Rebuild the full glyph tree from the bar's voices and compute
    /// the natural width. No-op for placeholder renderers without a bar.
    fn do_layout(&mut self) {
        if self.base().bar.is_none() {
            return;
        }
        self.base_mut().begin_layout();
        self.create_pre_beat_glyphs();
        self.create_beat_glyphs();
        self.create_post_beat_glyphs();
        self.base_mut().update_sizes();
    }

    fn register_layouting_info(&mut self) {
        self.base().register_layouting_info();
    }

    fn apply_layouting_info(&mut self) -> bool {
        self.base_mut().apply_layouting_info()
    }

    fn scale_to_width(&mut self, width: f64) {
        self.base_mut().scale_to_width(width);
    }

    fn finalize_renderer(&mut self) {
        self.base_mut().finalize_renderer();
    }

    /// Re-entrant correction for a flipped first-of-line status: only
    /// the pre-beat block is rebuilt, then sizes are recomputed and the
    /// layouting info re-registered — never a full relayout.
    fn re_layout(&mut self) {
        let flipped = {
            let base = self.base();
            base.was_first_of_line() != base.is_first_of_line()
        };
        if flipped {
            self.base_mut().reset_pre_beat_glyphs();
            self.create_pre_beat_glyphs();
        }
        let base = self.base_mut();
        base.update_sizes();
        base.register_layouting_info();
    }

    /// Draw the bar at the absolute offset (cx + x, cy + y): background,
    /// then pre-beat group, voice containers (secondary voices in the
    /// secondary color), and post-beat group. Bars carrying a simile
    /// mark paint the repeat symbol instead of their contents.
    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        self.paint_background(cx, cy, canvas);
        let base = self.base();
        if let Some(bar) = base.bar {
            match bar.simile_mark {
                SimileMark::Simple | SimileMark::SecondOfDouble => {
                    base.paint_simile_mark(cx, cy, canvas);
                    return;
                }
                _ => {}
            }
        }
        base.paint_contents(cx, cy, canvas);
        self.paint_decorations(cx, cy, canvas);
    }

    fn build_boundings_lookup(&self, master: &mut MasterBarBounds, cx: f64, cy: f64) {
        self.base().build_boundings_lookup(master, cx, cy);
    }
}
