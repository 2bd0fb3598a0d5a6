//! The monophonic engine: one tone at a time for the whole keyboard.
//!
//! `trigger` is the only way in. It always cuts off whatever is sounding
//! before looking at the new note, so two keys can never overlap and a key
//! bound to a note the table does not know silences the keyboard instead of
//! failing.
//!
//! Voices end on their own on the audio side. That end is reported back as a
//! [`VoiceEvent::Ended`] which [`MonoEngine::poll`] applies from the caller's
//! event loop, and only if the ended voice is still the one being tracked: by
//! the time a notification is read, a newer trigger may have replaced it.

use tracing::{debug, trace};

use crate::{
    error::EngineError,
    io::context::AudioContext,
    notes::{NoteTable, NOTES},
    synth::{
        message::VoiceEvent,
        voice::{ToneVoice, VoiceHandle},
    },
};

/// Builds the audio context on first use.
pub type ContextFactory = Box<dyn FnMut() -> Result<AudioContext, EngineError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No voice is tracked.
    Idle,
    /// Exactly one voice is tracked.
    Sounding,
}

/// The tracked voice and the note that started it.
#[derive(Debug)]
pub struct ActiveNote {
    pub note: String,
    pub voice: VoiceHandle,
}

pub struct MonoEngine {
    table: &'static NoteTable,
    factory: ContextFactory,
    context: Option<AudioContext>,
    current: Option<ActiveNote>,
}

impl MonoEngine {
    /// Engine whose context comes from `factory`, called once on the first
    /// trigger.
    pub fn new(factory: impl FnMut() -> Result<AudioContext, EngineError> + 'static) -> Self {
        Self {
            table: &NOTES,
            factory: Box::new(factory),
            context: None,
            current: None,
        }
    }

    /// Engine playing through the default output device.
    pub fn with_default_output() -> Self {
        Self::new(AudioContext::open_default)
    }

    /// Engine on an offline context the caller renders.
    pub fn offline(sample_rate: f32) -> Self {
        Self::new(move || Ok(AudioContext::offline(sample_rate)))
    }

    /// Play `note`, cutting off anything already sounding.
    ///
    /// Pending natural ends are applied first, as `poll` would. An unknown
    /// note stops the current tone and starts nothing. The only
    /// error is failing to open the audio output on the first call.
    pub fn trigger(&mut self, note: &str) -> Result<(), EngineError> {
        // Settle ends the loop has not polled yet so the ring never backs up
        self.poll();

        let context = Self::ensure_context(&mut self.context, &mut self.factory)?;

        if let Some(previous) = self.current.take() {
            let cut = previous.voice.stop();
            debug!(note = %previous.note, id = previous.voice.id().get(), cut, "superseded");
        }

        let Some(frequency) = self.table.lookup(note) else {
            debug!(note, "unknown note, keyboard silenced");
            return Ok(());
        };

        let voice = ToneVoice::start(context, frequency)?;
        debug!(
            note,
            frequency,
            id = voice.id().get(),
            start = voice.start_time(),
            "voice started"
        );

        self.current = Some(ActiveNote {
            note: note.to_owned(),
            voice,
        });
        Ok(())
    }

    /// Apply pending natural-end notifications. Returns how many were read.
    ///
    /// Call this from the same loop that calls `trigger`.
    pub fn poll(&mut self) -> usize {
        let Some(context) = self.context.as_mut() else {
            return 0;
        };

        let mut handled = 0;
        while let Some(event) = context.pop_event() {
            handled += 1;
            match event {
                VoiceEvent::Ended { id } => {
                    let tracked = self.current.as_ref().is_some_and(|a| a.voice.id() == id);
                    if tracked {
                        debug!(id = id.get(), "voice ended");
                        self.current = None;
                    } else {
                        trace!(id = id.get(), "ignoring end of a superseded voice");
                    }
                }
            }
        }
        handled
    }

    pub fn state(&self) -> EngineState {
        if self.current.is_some() {
            EngineState::Sounding
        } else {
            EngineState::Idle
        }
    }

    pub fn current(&self) -> Option<&ActiveNote> {
        self.current.as_ref()
    }

    /// The audio context, once the first trigger has created it.
    pub fn context(&self) -> Option<&AudioContext> {
        self.context.as_ref()
    }

    pub fn table(&self) -> &'static NoteTable {
        self.table
    }

    fn ensure_context<'a>(
        slot: &'a mut Option<AudioContext>,
        factory: &mut ContextFactory,
    ) -> Result<&'a AudioContext, EngineError> {
        let context = match slot.take() {
            Some(context) => context,
            None => factory()?,
        };
        Ok(slot.insert(context))
    }
}
