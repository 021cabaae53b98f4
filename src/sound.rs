//! Fire-and-forget sound triggers. The core only says what happened; the
//! host decides what, if anything, to play.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    Shot,
    EnemySpawn,
    Death,
    MusicPlay,
    MusicPause,
    MusicResume,
}

pub trait SoundSink {
    fn play(&mut self, sound: Sound);
}

/// Discards every trigger.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _sound: Sound) {}
}

impl SoundSink for Vec<Sound> {
    fn play(&mut self, sound: Sound) {
        self.push(sound);
    }
}
