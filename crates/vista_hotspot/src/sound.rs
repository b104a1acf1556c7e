//! Positional sound attached to a hotspot.
//!
//! This is the bookkeeping half of spatial audio: what to play, whether it
//! is playing, and the gain/pan a mixer should use for the listener at the
//! scene origin.  Decoding and output belong to the audio backend.

use std::time::{Duration, Instant};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::transform::{HotspotTransform, TransformConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SoundOptions {
    pub volume: f32,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub auto_play: bool,
    /// Distance at which the gain starts to fall off.
    pub ref_distance: f32,
    pub rolloff: f32,
}

impl Default for SoundOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: false,
            auto_play: false,
            ref_distance: 1.0,
            rolloff: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub source: SoundSource,
    pub options: SoundOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundState {
    Unloaded,
    Loaded,
    Playing,
    Stopped,
    Destroyed,
}

#[derive(Debug)]
pub struct HotspotSound {
    url: Option<String>,
    options: SoundOptions,
    position: Vec3,
    state: SoundState,
    started: Option<Instant>,
    auto_played: bool,
}

impl Default for HotspotSound {
    fn default() -> Self {
        Self::new()
    }
}

impl HotspotSound {
    pub fn new() -> Self {
        Self {
            url: None,
            options: SoundOptions::default(),
            position: Vec3::ZERO,
            state: SoundState::Unloaded,
            started: None,
            auto_played: false,
        }
    }

    /// `transform` is the hotspot's own transform document; the sound sits
    /// where the hotspot does.
    pub fn load(&mut self, config: &SoundConfig, transform: Option<&TransformConfig>) {
        self.url = config.source.url.clone();
        self.options = config.options.clone();
        self.position = transform
            .map(|t| HotspotTransform::from_config(t).position)
            .unwrap_or(Vec3::ZERO);
        self.state = if self.url.is_some() {
            SoundState::Loaded
        } else {
            log::warn!("sound without a source url");
            SoundState::Unloaded
        };
    }

    /// Per-frame step: starts an auto-play sound the first time it is seen
    /// loaded.
    pub fn update(&mut self) {
        if self.state == SoundState::Loaded && self.options.auto_play && !self.auto_played {
            self.auto_played = true;
            self.play();
        }
    }

    pub fn play(&mut self) {
        if matches!(self.state, SoundState::Loaded | SoundState::Stopped) {
            log::debug!("sound {:?} playing", self.url);
            self.started = Some(Instant::now());
            self.state = SoundState::Playing;
        }
    }

    pub fn stop(&mut self) {
        if self.state == SoundState::Playing {
            self.started = None;
            self.state = SoundState::Stopped;
        }
    }

    pub fn destroy(&mut self) {
        self.stop();
        self.url = None;
        self.state = SoundState::Destroyed;
    }

    pub fn state(&self) -> SoundState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SoundState::Playing
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn options(&self) -> &SoundOptions {
        &self.options
    }

    pub fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |s| s.elapsed())
    }

    /// Inverse-distance gain for a listener at the origin.
    pub fn gain(&self) -> f32 {
        let r = self.options.ref_distance.max(f32::EPSILON);
        let d = self.position.length().max(r);
        self.options.volume * r / (r + self.options.rolloff * (d - r))
    }

    /// Stereo pan in `[-1, 1]` for a listener at the origin looking along
    /// `yaw` (radians, 0 = −Z); positive is to the right.
    pub fn pan(&self, yaw: f32) -> f32 {
        if self.position.x == 0.0 && self.position.z == 0.0 {
            return 0.0;
        }
        let azimuth = self.position.x.atan2(-self.position.z);
        (azimuth - yaw).sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded(sound: serde_json::Value, transform: serde_json::Value) -> HotspotSound {
        let config: SoundConfig = serde_json::from_value(sound).unwrap();
        let transform: TransformConfig = serde_json::from_value(transform).unwrap();
        let mut s = HotspotSound::new();
        s.load(&config, Some(&transform));
        s
    }

    #[test]
    fn takes_position_from_the_transform_document() {
        let s = loaded(
            json!({ "source": { "url": "a.ogg" } }),
            json!({ "position": { "x": 3, "y": 0, "z": -4 } }),
        );
        assert_eq!(s.position(), Vec3::new(3.0, 0.0, -4.0));
        assert_eq!(s.state(), SoundState::Loaded);
        assert!((s.gain() - 1.0 / 5.0).abs() < 1e-6);
    }

    #[test]
    fn auto_play_happens_once() {
        let mut s = loaded(
            json!({ "source": { "url": "a.ogg" }, "options": { "autoPlay": true } }),
            json!({}),
        );
        s.update();
        assert!(s.is_playing());
        s.stop();
        s.update();
        assert!(!s.is_playing());
    }

    #[test]
    fn pan_follows_azimuth() {
        let right = loaded(json!({ "source": { "url": "a" } }), json!({ "position": { "x": 10, "z": 0 } }));
        assert!((right.pan(0.0) - 1.0).abs() < 1e-6);
        let ahead = loaded(json!({ "source": { "url": "a" } }), json!({ "position": { "z": -10 } }));
        assert!(ahead.pan(0.0).abs() < 1e-6);
    }

    #[test]
    fn no_url_stays_unloaded() {
        let mut s = loaded(json!({}), json!({}));
        s.update();
        assert_eq!(s.state(), SoundState::Unloaded);
        s.destroy();
        assert_eq!(s.state(), SoundState::Destroyed);
    }
}
