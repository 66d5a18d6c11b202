//! Decks
//!
//! A deck binds one playback device and one now-playing display, fixed at
//! construction, to its own queue of pending tracks. Taking a track off the
//! queue to play it always hands it to both collaborators; discarding queued
//! tracks never touches playback.

mod display;
mod headless;
mod queue;
mod traits;

pub use display::TrackDisplay;
pub use headless::HeadlessDeck;
pub use queue::{DeckQueue, QueuedTrack};
pub use traits::{NowPlayingDisplay, PlaybackDevice};

use crate::error::DeckIdError;
use crate::model::TrackSource;
use std::fmt;
use std::path::Path;

/// Maximum playback speed ratio a deck accepts
pub const MAX_SPEED: f64 = 3.0;

/// The two decks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckId {
    One,
    Two,
}

impl DeckId {
    pub const ALL: [DeckId; 2] = [DeckId::One, DeckId::Two];

    /// 1-based number shown to users
    pub fn number(self) -> u8 {
        match self {
            DeckId::One => 1,
            DeckId::Two => 2,
        }
    }
}

impl TryFrom<u8> for DeckId {
    type Error = DeckIdError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(DeckId::One),
            2 => Ok(DeckId::Two),
            other => Err(DeckIdError(other)),
        }
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck {}", self.number())
    }
}

/// One deck: playback, display and pending queue
pub struct Deck<D: PlaybackDevice, V: NowPlayingDisplay> {
    id: DeckId,
    device: D,
    display: V,
    queue: DeckQueue,
}

impl<D: PlaybackDevice, V: NowPlayingDisplay> Deck<D, V> {
    pub fn new(id: DeckId, device: D, display: V) -> Self {
        Self {
            id,
            device,
            display,
            queue: DeckQueue::new(),
        }
    }

    pub fn id(&self) -> DeckId {
        self.id
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn display(&self) -> &V {
        &self.display
    }

    pub fn queue(&self) -> &DeckQueue {
        &self.queue
    }

    /// Append a track to this deck's queue
    pub fn enqueue(&mut self, source: TrackSource, title: String) {
        log::info!("{}: queued {}", self.id, title);
        self.queue.enqueue(source, title);
    }

    /// Take the head of the queue and start playing it
    pub fn dequeue_next(&mut self) -> Option<QueuedTrack> {
        let track = self.queue.pop_front()?;
        self.play(&track);
        Some(track)
    }

    /// Take the queued entry at `index` and start playing it
    pub fn play_queued(&mut self, index: usize) -> Option<QueuedTrack> {
        let track = self.queue.take_at(index)?;
        self.play(&track);
        Some(track)
    }

    /// Discard the queued entry at `index` without playing it
    pub fn remove_queued(&mut self, index: usize) -> bool {
        self.queue.remove_at(index)
    }

    /// Discard everything queued
    pub fn clear_queue(&mut self) {
        log::debug!("{}: queue cleared", self.id);
        self.queue.clear();
    }

    pub fn has_queued(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Load a track straight onto the deck, bypassing the queue
    pub fn load(&mut self, source: &TrackSource, title: &str) {
        log::info!("{}: loading {}", self.id, title);
        self.device.load_source(source);
        self.display.update_waveform(source);
        self.display.update_track_name(title);
    }

    /// Load a file from disk; `false` when there is no such file
    pub fn load_file(&mut self, path: &Path) -> bool {
        if !path.is_file() {
            log::warn!("{}: not a file, ignoring {:?}", self.id, path);
            return false;
        }

        let source = TrackSource::from_file(path);
        let title = source.title();
        self.load(&source, &title);
        true
    }

    pub fn start(&mut self) {
        self.device.start();
    }

    pub fn stop(&mut self) {
        self.device.stop();
    }

    pub fn set_gain(&mut self, gain: f64) {
        self.device.set_gain(clamp_unit(gain, 0.0, 1.0));
    }

    pub fn set_speed(&mut self, ratio: f64) {
        self.device.set_speed(clamp_unit(ratio, 0.0, MAX_SPEED));
    }

    pub fn set_position_relative(&mut self, position: f64) {
        self.device.set_position_relative(clamp_unit(position, 0.0, 1.0));
    }

    /// Timer tick: move the display's play head to the device's position
    pub fn refresh_position(&mut self) {
        let position = self.device.position_relative();
        self.display.update_position(position);
    }

    fn play(&mut self, track: &QueuedTrack) {
        log::info!("{}: playing {} from queue", self.id, track.title);
        self.device.load_source(&track.source);
        self.device.start();
        self.display.update_waveform(&track.source);
        self.display.update_track_name(&track.title);
    }
}

/// Clamp into `[min, max]`, mapping NaN to `min`
fn clamp_unit(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{recording_deck, Call};
    use super::*;

    fn enqueue(deck: &mut Deck<impl PlaybackDevice, impl NowPlayingDisplay>, name: &str) {
        let source = TrackSource::parse(name);
        let title = source.title();
        deck.enqueue(source, title);
    }

    #[test]
    fn test_deck_id_numbers() {
        assert_eq!(DeckId::try_from(1), Ok(DeckId::One));
        assert_eq!(DeckId::try_from(2), Ok(DeckId::Two));
        assert_eq!(DeckId::try_from(3), Err(DeckIdError(3)));
        assert_eq!(DeckId::Two.to_string(), "Deck 2");
    }

    #[test]
    fn test_dequeue_next_hands_off_once() {
        let mut deck = recording_deck(DeckId::One);
        enqueue(&mut deck, "x.wav");
        enqueue(&mut deck, "y.wav");

        assert!(deck.remove_queued(0));
        assert!(deck.device().calls.is_empty());

        let played = deck.dequeue_next().unwrap();
        assert_eq!(played.title, "y");
        assert!(!deck.has_queued());

        let y = played.source.to_string();
        assert_eq!(deck.device().calls, vec![Call::Load(y.clone()), Call::Start]);
        assert_eq!(
            deck.display().calls,
            vec![Call::Waveform(y), Call::TrackName("y".to_string())]
        );
    }

    #[test]
    fn test_dequeue_on_empty_queue_does_nothing() {
        let mut deck = recording_deck(DeckId::Two);

        assert!(deck.dequeue_next().is_none());
        assert!(deck.play_queued(0).is_none());
        assert!(!deck.remove_queued(0));
        assert!(deck.device().calls.is_empty());
        assert!(deck.display().calls.is_empty());
    }

    #[test]
    fn test_play_queued_takes_selected_row() {
        let mut deck = recording_deck(DeckId::One);
        for name in ["a.wav", "b.wav", "c.wav"] {
            enqueue(&mut deck, name);
        }

        assert_eq!(deck.play_queued(1).unwrap().title, "b");

        let remaining: Vec<&str> = deck.queue().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(remaining, vec!["a", "c"]);
        assert_eq!(deck.device().calls.len(), 2);
    }

    #[test]
    fn test_clear_queue_does_not_play() {
        let mut deck = recording_deck(DeckId::One);
        enqueue(&mut deck, "a.wav");

        deck.clear_queue();
        assert!(!deck.has_queued());
        assert!(deck.device().calls.is_empty());
    }

    #[test]
    fn test_load_does_not_start() {
        let mut deck = recording_deck(DeckId::One);
        let source = TrackSource::parse("/music/a.wav");

        deck.load(&source, "a");
        assert_eq!(deck.device().calls, vec![Call::Load(source.to_string())]);
        assert_eq!(deck.display().calls.len(), 2);
    }

    #[test]
    fn test_load_file_requires_file() {
        let mut deck = recording_deck(DeckId::One);
        assert!(!deck.load_file(Path::new("/nonexistent/track.wav")));
        assert!(deck.device().calls.is_empty());
    }

    #[test]
    fn test_transport_values_are_clamped() {
        let mut deck = recording_deck(DeckId::One);

        deck.set_gain(1.5);
        deck.set_speed(7.0);
        deck.set_position_relative(-0.2);
        deck.set_speed(f64::NAN);

        assert_eq!(
            deck.device().calls,
            vec![
                Call::Gain(1.0),
                Call::Speed(MAX_SPEED),
                Call::Seek(0.0),
                Call::Speed(0.0)
            ]
        );
    }

    #[test]
    fn test_refresh_position_follows_device() {
        let mut deck = recording_deck(DeckId::One);
        deck.set_position_relative(0.25);
        deck.refresh_position();

        assert_eq!(deck.display().calls, vec![Call::Position(0.25)]);
    }
}
