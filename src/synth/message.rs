use rtrb::Consumer;

/// Identifies one started voice for the lifetime of its audio context.
///
/// Ids are never reused, so a notification about an old voice can always be
/// told apart from one about the voice currently playing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub(crate) u64);

impl VoiceId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Notifications sent from the audio side back to the control side.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    /// The voice reached its scheduled stop and its nodes were released.
    Ended { id: VoiceId },
}

pub trait EventReceiver {
    fn pop(&mut self) -> Option<VoiceEvent>;
}

impl EventReceiver for Consumer<VoiceEvent> {
    fn pop(&mut self) -> Option<VoiceEvent> {
        Consumer::pop(self).ok()
    }
}
