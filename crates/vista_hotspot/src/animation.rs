//! Keyframe animation of a hotspot's transform.
//!
//! An animation owns a list of tracks.  Each track is a list of keyframes
//! with a time in milliseconds; [`HotspotAnimation::tick`] interpolates the
//! active track, writes the result into the shared [`HotspotTransform`] and
//! announces it on `on_progress`.  When a track ends the next one starts,
//! either in order or picked at random.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use vista_core::Signal;

use crate::transform::{HotspotTransform, PositionConfig, Vec3Config};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyframeConfig {
    /// Milliseconds from the start of the track.
    pub time: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3Config>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3Config>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub easing: Easing,
    pub keyframes: Vec<KeyframeConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    pub enabled: bool,
    pub auto_play: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub random: bool,
    pub tracks: Vec<TrackConfig>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_play: false,
            looping: false,
            random: false,
            tracks: Vec::new(),
        }
    }
}

/// Sent with every `on_progress` dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationProgress {
    pub track: usize,
    /// Eased position within the track, `0.0..=1.0`.
    pub progress: f32,
}

pub struct HotspotAnimation {
    transform: Rc<RefCell<HotspotTransform>>,
    config: AnimationConfig,
    current: usize,
    elapsed_ms: f32,
    playing: bool,
    /// Transform at the start of the current track; fills channels a
    /// keyframe leaves out.
    origin: HotspotTransform,
    pub on_progress: Signal<AnimationProgress>,
    pub on_complete: Signal<()>,
}

impl std::fmt::Debug for HotspotAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotspotAnimation")
            .field("tracks", &self.config.tracks.len())
            .field("current", &self.current)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("playing", &self.playing)
            .finish()
    }
}

impl HotspotAnimation {
    pub fn new(transform: Rc<RefCell<HotspotTransform>>) -> Self {
        Self {
            transform,
            config: AnimationConfig::default(),
            current: 0,
            elapsed_ms: 0.0,
            playing: false,
            origin: HotspotTransform::default(),
            on_progress: Signal::new(),
            on_complete: Signal::new(),
        }
    }

    pub fn load(&mut self, config: &AnimationConfig) {
        self.stop();
        self.config = config.clone();
        for track in &mut self.config.tracks {
            track.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
    }

    pub fn auto_play(&self) -> bool {
        self.config.enabled && self.config.auto_play
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_track(&self) -> usize {
        self.current
    }

    pub fn track_count(&self) -> usize {
        self.config.tracks.len()
    }

    /// Start from the first track (a random one when `random` is set).
    pub fn play(&mut self) {
        if !self.config.enabled || self.config.tracks.is_empty() {
            return;
        }
        let first = if self.config.random { self.random_track() } else { 0 };
        self.start_track(first);
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.elapsed_ms = 0.0;
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.elapsed_ms += dt * 1000.0;

        let Some(track) = self.config.tracks.get(self.current) else {
            self.finish();
            return;
        };
        let duration = track.keyframes.last().map_or(0.0, |k| k.time);
        let t = self.elapsed_ms.min(duration);
        let frame = sample(track, &self.origin, t);
        let progress = if duration > 0.0 { track.easing.apply(t / duration) } else { 1.0 };

        *self.transform.borrow_mut() = frame;
        self.on_progress.dispatch(&AnimationProgress { track: self.current, progress });

        if self.elapsed_ms >= duration {
            self.advance();
        }
    }

    pub fn destroy(&mut self) {
        self.stop();
        self.on_progress.clear();
        self.on_complete.clear();
        self.config.tracks.clear();
    }

    fn start_track(&mut self, index: usize) {
        self.current = index;
        self.elapsed_ms = 0.0;
        self.origin = *self.transform.borrow();
    }

    /// Sequential tracks run in order; a random pick plays alone unless
    /// looping, in which case another random track follows.
    fn advance(&mut self) {
        let next = if self.config.random {
            self.config.looping.then(|| self.random_track())
        } else if self.current + 1 < self.config.tracks.len() {
            Some(self.current + 1)
        } else {
            self.config.looping.then_some(0)
        };
        match next {
            Some(index) => self.start_track(index),
            None => self.finish(),
        }
    }

    fn finish(&mut self) {
        self.playing = false;
        self.on_complete.dispatch(&());
    }

    fn random_track(&self) -> usize {
        rand::thread_rng().gen_range(0..self.config.tracks.len())
    }
}

/// Interpolate `track` at `t` ms.  Channels a keyframe does not set are taken
/// from `origin`.
fn sample(track: &TrackConfig, origin: &HotspotTransform, t: f32) -> HotspotTransform {
    let resolve = |k: &KeyframeConfig| HotspotTransform {
        position: k.position.map_or(origin.position, |p| p.resolve(origin.position)),
        rotation: k.rotation.map_or(origin.rotation, |r| r.apply_over(origin.rotation)),
        scale: k.scale.map_or(origin.scale, |s| s.apply_over(origin.scale)),
    };

    let frames = &track.keyframes;
    let Some(first) = frames.first() else {
        return *origin;
    };
    if t <= first.time {
        // Before the first keyframe: ease from the origin into it.
        let to = resolve(first);
        let f = if first.time > 0.0 { track.easing.apply(t / first.time) } else { 1.0 };
        return lerp(origin, &to, f);
    }
    for pair in frames.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t <= b.time {
            let span = b.time - a.time;
            let f = if span > 0.0 { track.easing.apply((t - a.time) / span) } else { 1.0 };
            return lerp(&resolve(a), &resolve(b), f);
        }
    }
    frames.last().map_or(*origin, resolve)
}

fn lerp(a: &HotspotTransform, b: &HotspotTransform, f: f32) -> HotspotTransform {
    let mix = |x: Vec3, y: Vec3| x.lerp(y, f);
    HotspotTransform {
        position: mix(a.position, b.position),
        rotation: mix(a.rotation, b.rotation),
        scale: mix(a.scale, b.scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn config(v: serde_json::Value) -> AnimationConfig {
        serde_json::from_value(v).unwrap()
    }

    fn shared() -> Rc<RefCell<HotspotTransform>> {
        Rc::new(RefCell::new(HotspotTransform::default()))
    }

    fn one_track(looping: bool) -> AnimationConfig {
        config(json!({
            "autoPlay": true,
            "loop": looping,
            "tracks": [{
                "keyframes": [
                    { "time": 0, "rotation": { "y": 0 } },
                    { "time": 1000, "rotation": { "y": 90 } }
                ]
            }]
        }))
    }

    #[test]
    fn ticks_interpolate_and_notify() {
        let t = shared();
        let mut a = HotspotAnimation::new(Rc::clone(&t));
        a.load(&one_track(false));
        assert!(a.auto_play());
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        a.on_progress.add(move |_| s.set(s.get() + 1));

        a.play();
        a.tick(0.5);
        assert!((t.borrow().rotation.y - 45.0).abs() < 1e-3);
        assert_eq!(seen.get(), 1);
        assert!(a.is_playing());
    }

    #[test]
    fn completes_after_the_last_track() {
        let t = shared();
        let mut a = HotspotAnimation::new(Rc::clone(&t));
        a.load(&one_track(false));
        let done = Rc::new(Cell::new(false));
        let d = Rc::clone(&done);
        a.on_complete.add(move |_| d.set(true));

        a.play();
        a.tick(2.0);
        assert!(done.get());
        assert!(!a.is_playing());
        assert_eq!(t.borrow().rotation.y, 90.0);
    }

    #[test]
    fn loops_back_to_the_first_track() {
        let mut a = HotspotAnimation::new(shared());
        a.load(&one_track(true));
        a.play();
        a.tick(1.5);
        assert!(a.is_playing());
        assert_eq!(a.current_track(), 0);
    }

    #[test]
    fn missing_channels_keep_the_origin() {
        let t = shared();
        t.borrow_mut().position = Vec3::new(0.0, 0.0, -5.0);
        let mut a = HotspotAnimation::new(Rc::clone(&t));
        a.load(&one_track(false));
        a.play();
        a.tick(0.25);
        assert_eq!(t.borrow().position, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn disabled_animation_does_not_play() {
        let mut a = HotspotAnimation::new(shared());
        let mut c = one_track(false);
        c.enabled = false;
        a.load(&c);
        assert!(!a.auto_play());
        a.play();
        assert!(!a.is_playing());
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let e = Easing::EaseInOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(1.0), 1.0);
        assert!((e.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-6);
    }
}
