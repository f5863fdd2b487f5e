//! Beam grouping across beats, used to align stems and beams.
//!
//! A beaming helper covers one run of consecutive beamable beats in a
//! voice. On-notes glyphs register their stem x-position with the
//! helper during layout; the paint pass reads the registered extent to
//! connect the group with a beam.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::model::Bar;

/// Beats connected by a rhythmic beam within one voice.
#[derive(Debug)]
pub struct BeamingHelper {
    pub voice_index: usize,
    /// Beat indices in the group, in order.
    pub beats: Vec<usize>,
    beat_line_x: BTreeMap<usize, f64>,
}

impl BeamingHelper {
    fn new(voice_index: usize, first_beat: usize) -> Self {
        Self {
            voice_index,
            beats: vec![first_beat],
            beat_line_x: BTreeMap::new(),
        }
    }

    /// Record the stem x-position of a beat (bar-relative). Repeated
    /// registration for the same beat overwrites the previous value so
    /// repositioning passes never leave stale extremes behind.
    pub fn register_beat_line_x(&mut self, beat_index: usize, x: f64) {
        self.beat_line_x.insert(beat_index, x);
    }

    pub fn beat_line_x(&self, beat_index: usize) -> Option<f64> {
        self.beat_line_x.get(&beat_index).copied()
    }

    /// Leftmost registered stem position of the group.
    pub fn min_x(&self) -> Option<f64> {
        self.beat_line_x.values().copied().reduce(f64::min)
    }

    /// Rightmost registered stem position of the group.
    pub fn max_x(&self) -> Option<f64> {
        self.beat_line_x.values().copied().reduce(f64::max)
    }

    /// Whether the group connects more than one beat with a beam.
    pub fn has_beams(&self) -> bool {
        self.beats.len() > 1
    }

    pub fn is_start(&self, beat_index: usize) -> bool {
        self.beats.first() == Some(&beat_index)
    }

    pub fn is_end(&self, beat_index: usize) -> bool {
        self.beats.last() == Some(&beat_index)
    }
}

/// Per-bar lookup of beaming helpers, per voice and keyed by beat index.
#[derive(Debug)]
pub struct BarHelpers {
    lookup: Vec<BTreeMap<usize, Rc<RefCell<BeamingHelper>>>>,
}

impl BarHelpers {
    /// Group the beats of every voice: consecutive beamable beats
    /// (eighth and shorter, carrying notes) share one helper; rests,
    /// grace beats and longer durations break the run and get a helper
    /// of their own.
    pub fn new(bar: &Bar) -> Self {
        let mut lookup = Vec::with_capacity(bar.voices.len());
        for voice in &bar.voices {
            let mut map: BTreeMap<usize, Rc<RefCell<BeamingHelper>>> = BTreeMap::new();
            let mut current: Option<Rc<RefCell<BeamingHelper>>> = None;
            for beat in &voice.beats {
                let beamable = beat.duration.is_beamable()
                    && !beat.is_rest()
                    && !beat.empty
                    && !beat.is_grace();
                let helper = if beamable {
                    match &current {
                        Some(helper) => {
                            helper.borrow_mut().beats.push(beat.index);
                            helper.clone()
                        }
                        None => {
                            let helper =
                                Rc::new(RefCell::new(BeamingHelper::new(voice.index, beat.index)));
                            current = Some(helper.clone());
                            helper
                        }
                    }
                } else {
                    current = None;
                    Rc::new(RefCell::new(BeamingHelper::new(voice.index, beat.index)))
                };
                map.insert(beat.index, helper);
            }
            lookup.push(map);
        }
        Self { lookup }
    }

    pub fn helper_for(
        &self,
        voice_index: usize,
        beat_index: usize,
    ) -> Option<Rc<RefCell<BeamingHelper>>> {
        self.lookup.get(voice_index)?.get(&beat_index).cloned()
    }
}
