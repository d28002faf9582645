//! Presentation seams. The simulation reports effects and audio cues
//! through these traits; it never owns a renderer or a mixer. Null and
//! recording implementations ship for headless use and tests.

use crate::types::{AudioCue, Vec2};

/// Visual feedback hook. Implementations may drop events on the floor;
/// the simulation never reads anything back.
pub trait EffectSink {
    fn damage_number(&mut self, pos: Vec2, amount: i32, crit: bool);
    fn heal_number(&mut self, pos: Vec2, amount: i32);
    fn screen_shake(&mut self, intensity: f32);
    /// Telegraph for a zone that will arm after `delay` seconds.
    fn telegraph(&mut self, pos: Vec2, radius: f32, delay: f32);
}

pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn damage_number(&mut self, _pos: Vec2, _amount: i32, _crit: bool) {}
    fn heal_number(&mut self, _pos: Vec2, _amount: i32) {}
    fn screen_shake(&mut self, _intensity: f32) {}
    fn telegraph(&mut self, _pos: Vec2, _radius: f32, _delay: f32) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectEvent {
    DamageNumber { pos: Vec2, amount: i32, crit: bool },
    HealNumber { pos: Vec2, amount: i32 },
    ScreenShake { intensity: f32 },
    Telegraph { pos: Vec2, radius: f32, delay: f32 },
}

/// Captures everything for later inspection. Used by tests and the soak
/// harness.
#[derive(Clone, Debug, Default)]
pub struct RecordingEffects {
    pub events: Vec<EffectEvent>,
}

impl EffectSink for RecordingEffects {
    fn damage_number(&mut self, pos: Vec2, amount: i32, crit: bool) {
        self.events.push(EffectEvent::DamageNumber { pos, amount, crit });
    }

    fn heal_number(&mut self, pos: Vec2, amount: i32) {
        self.events.push(EffectEvent::HealNumber { pos, amount });
    }

    fn screen_shake(&mut self, intensity: f32) {
        self.events.push(EffectEvent::ScreenShake { intensity });
    }

    fn telegraph(&mut self, pos: Vec2, radius: f32, delay: f32) {
        self.events.push(EffectEvent::Telegraph { pos, radius, delay });
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingAudio {
    pub cues: Vec<AudioCue>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }
}
