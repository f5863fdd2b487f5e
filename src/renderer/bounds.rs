//! Interactive geometry derived from the laid-out glyph tree.
//!
//! Every rectangle comes in two flavors: the visual bounds hug the
//! painted content, the real bounds cover the full cell including
//! inter-beat spacing. Back-references to the source bar/voice/beat are
//! carried as indices, never as live pointers, so the geometry can
//! outlive the renderers that produced it.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    /// Grow this rectangle to cover `other`.
    pub fn extend_with(&mut self, other: &Bounds) {
        if self.w == 0.0 && self.h == 0.0 {
            *self = *other;
            return;
        }
        let right = (self.x + self.w).max(other.x + other.w);
        let bottom = (self.y + self.h).max(other.y + other.h);
        self.x = self.x.min(other.x);
        self.y = self.y.min(other.y);
        self.w = right - self.x;
        self.h = bottom - self.y;
    }
}

/// Geometry of one beat cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatBounds {
    pub voice_index: usize,
    pub beat_index: usize,
    /// Content span of the on-notes glyphs.
    pub visual_bounds: Bounds,
    /// Full beat cell including inter-beat spacing.
    pub real_bounds: Bounds,
}

/// Geometry of one bar on one stave, with its nested beat cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarBounds {
    pub bar_index: usize,
    pub visual_bounds: Bounds,
    pub real_bounds: Bounds,
    pub beats: Vec<BeatBounds>,
}

impl BarBounds {
    pub fn add_beat(&mut self, beat: BeatBounds) {
        self.beats.push(beat);
    }
}

/// Geometry of one bar column across all staves of a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterBarBounds {
    /// Bar column index.
    pub index: usize,
    pub is_first_of_line: bool,
    pub visual_bounds: Bounds,
    pub real_bounds: Bounds,
    pub bars: Vec<BarBounds>,
}

impl MasterBarBounds {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            is_first_of_line: false,
            visual_bounds: Bounds::default(),
            real_bounds: Bounds::default(),
            bars: Vec::new(),
        }
    }

    /// Add one stave's bar geometry, growing the column rectangles.
    pub fn add_bar(&mut self, bar: BarBounds) {
        self.visual_bounds.extend_with(&bar.visual_bounds);
        self.real_bounds.extend_with(&bar.real_bounds);
        self.bars.push(bar);
    }

    /// Find the beat whose real cell contains the point.
    pub fn find_beat(&self, x: f64, y: f64) -> Option<&BeatBounds> {
        for bar in &self.bars {
            if !bar.real_bounds.contains(x, y) {
                continue;
            }
            for beat in &bar.beats {
                if beat.real_bounds.contains(x, y) {
                    return Some(beat);
                }
            }
        }
        None
    }
}

/// Geometry of everything rendered on a page, the entry point for
/// hit-testing and cursor placement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundsLookup {
    pub master_bars: Vec<MasterBarBounds>,
}

impl BoundsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_master_bar(&mut self, bounds: MasterBarBounds) {
        self.master_bars.push(bounds);
    }

    /// Find the beat at a surface position, if any.
    pub fn find_beat(&self, x: f64, y: f64) -> Option<&BeatBounds> {
        self.master_bars
            .iter()
            .find(|mb| mb.real_bounds.contains(x, y))
            .and_then(|mb| mb.find_beat(x, y))
    }

    /// Serialize the geometry for interactive layers outside the crate.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("JSON serialization error: {e}"))
    }
}
