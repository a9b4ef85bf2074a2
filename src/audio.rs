//! Audio collaborator
//!
//! The core fires cues and never waits on them. Mixing and playback belong to
//! whatever implements [`AudioSink`].

use std::collections::BTreeSet;

use glam::Vec3;

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SoundEffect {
    /// Player fires the equipped gun
    Shoot,
    /// Player shot lands on an enemy
    EnemyHit,
    /// Enemy fires a projectile
    EnemyShoot,
    /// Enemy projectile reaches the player
    PlayerHit,
    /// Enemy defeated
    Explosion,
    /// Projectile stopped by cover
    CoverHit,
    /// Breakable cover destroyed
    CoverBreak,
    /// Last enemy of a round defeated
    RoundClear,
    /// Run ended
    GameOver,
}

/// Playback backend
pub trait AudioSink {
    /// Fire-and-forget playback; `at` is `None` for non-positional cues
    fn play(&mut self, effect: SoundEffect, at: Option<Vec3>, volume: f32);
}

/// Sink that discards everything (missing or failed sound assets)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _at: Option<Vec3>, _volume: f32) {}
}

/// Sink that logs each cue, used by the headless driver
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, at: Option<Vec3>, volume: f32) {
        log::trace!("sound {:?} at {:?} vol {:.2}", effect, at, volume);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Cues whose sound asset failed to load
    silenced: BTreeSet<SoundEffect>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullAudio))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            silenced: BTreeSet::new(),
        }
    }

    /// Build a manager honoring the player's volume preferences
    pub fn with_settings(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Turn one cue into a no-op
    pub fn silence(&mut self, effect: SoundEffect) {
        if self.silenced.insert(effect) {
            log::debug!("Silenced {:?}", effect);
        }
    }

    pub fn is_silenced(&self, effect: SoundEffect) -> bool {
        self.silenced.contains(&effect)
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect, at: Option<Vec3>) {
        let vol = self.effective_volume();
        if vol <= 0.0 || self.silenced.contains(&effect) {
            return;
        }
        self.sink.play(effect, at, vol * relative_gain(effect));
    }
}

/// Per-cue mix level
fn relative_gain(effect: SoundEffect) -> f32 {
    match effect {
        SoundEffect::Shoot => 0.8,
        SoundEffect::EnemyHit => 0.5,
        SoundEffect::EnemyShoot => 0.4,
        SoundEffect::PlayerHit => 0.7,
        SoundEffect::Explosion => 0.9,
        SoundEffect::CoverHit => 0.4,
        SoundEffect::CoverBreak => 0.7,
        SoundEffect::RoundClear | SoundEffect::GameOver => 1.0,
    }
}
