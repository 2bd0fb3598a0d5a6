//! The shared audio processing context.
//!
//! An [`AudioContext`] owns the output bus every voice connects to, the frame
//! clock voices schedule against, and the receiving end of the natural-end
//! notifications. Build one per process: opening the platform output is
//! expensive and the bus is meant to be shared.
//!
//! Two flavours exist:
//! - [`AudioContext::offline`]: nothing pulls audio, the caller renders the
//!   bus with [`AudioContext::render`] (tests, benches, bouncing to memory).
//! - [`AudioContext::open_default`]: a cpal output stream renders the bus on
//!   the device's audio thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    graph::node::RenderCtx,
    synth::{
        message::{EventReceiver, VoiceEvent, VoiceId},
        voice::ToneVoice,
    },
    MAX_BLOCK_SIZE,
};

/// Capacity of the audio -> control notification ring.
pub const EVENT_QUEUE_SIZE: usize = 256;

/// The destination sink: mixes every connected voice into the output.
pub struct OutputBus {
    sample_rate: f32,
    /// Frames rendered since the context was created.
    frame: u64,
    next_id: u64,
    voices: Vec<ToneVoice>,
    events: Producer<VoiceEvent>,
    mix_buffer: Vec<f32>,
    scope: Option<Producer<f32>>,
}

impl OutputBus {
    fn new(sample_rate: f32) -> (Self, Consumer<VoiceEvent>) {
        let (events, rx) = RingBuffer::<VoiceEvent>::new(EVENT_QUEUE_SIZE);
        let bus = Self {
            sample_rate,
            frame: 0,
            next_id: 0,
            voices: Vec::with_capacity(2),
            events,
            mix_buffer: vec![0.0; MAX_BLOCK_SIZE],
            scope: None,
        };
        (bus, rx)
    }

    /// Render the next `out.len()` frames of the mix.
    ///
    /// Voices that finish during a chunk are released at the end of that
    /// chunk and announced with [`VoiceEvent::Ended`].
    pub fn render(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let ctx = RenderCtx::new(self.sample_rate);

        let scratch = &mut self.mix_buffer[..out.len()];
        for voice in &mut self.voices {
            scratch.fill(0.0);
            voice.render(scratch, &ctx);

            for (o, v) in out.iter_mut().zip(scratch.iter()) {
                *o += v;
            }
        }

        self.frame += out.len() as u64;
        self.release_finished();

        // Visualisers are best effort: drop the remainder if the ring is full
        if let Some(scope) = self.scope.as_mut() {
            for &s in out.iter() {
                if scope.push(s).is_err() {
                    break;
                }
            }
        }
    }

    fn release_finished(&mut self) {
        let events = &mut self.events;
        self.voices.retain(|voice| {
            if voice.is_active() {
                return true;
            }
            // trigger() drains the ring first, so it holds one end at most
            let _ = events.push(VoiceEvent::Ended { id: voice.id() });
            false
        });
    }

    pub(crate) fn allocate_id(&mut self) -> VoiceId {
        let id = VoiceId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn connect(&mut self, voice: ToneVoice) {
        self.voices.push(voice);
    }

    /// Remove and drop a voice. Returns false if it was not connected.
    pub(crate) fn disconnect(&mut self, id: VoiceId) -> bool {
        match self.voices.iter().position(|v| v.id() == id) {
            Some(idx) => {
                self.voices.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self, id: VoiceId) -> bool {
        self.voices.iter().any(|v| v.id() == id)
    }

    /// Number of voices currently connected (and so producing sound).
    pub fn live_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn set_scope(&mut self, scope: Producer<f32>) {
        self.scope = Some(scope);
    }
}

pub(crate) fn lock_bus(bus: &Mutex<OutputBus>) -> MutexGuard<'_, OutputBus> {
    // The bus stays consistent even if a render panicked mid-chunk
    bus.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct AudioContext {
    sample_rate: f32,
    bus: Arc<Mutex<OutputBus>>,
    events: Consumer<VoiceEvent>,
    /// Keeps the device stream running; None for offline contexts.
    _stream: Option<cpal::Stream>,
}

impl AudioContext {
    /// A context nothing renders on its own; drive it with [`render`](Self::render).
    pub fn offline(sample_rate: f32) -> Self {
        let (bus, events) = Self::new_bus(sample_rate);
        Self::from_parts(sample_rate, bus, events, None)
    }

    pub(crate) fn new_bus(sample_rate: f32) -> (Arc<Mutex<OutputBus>>, Consumer<VoiceEvent>) {
        let (bus, events) = OutputBus::new(sample_rate);
        (Arc::new(Mutex::new(bus)), events)
    }

    pub(crate) fn from_parts(
        sample_rate: f32,
        bus: Arc<Mutex<OutputBus>>,
        events: Consumer<VoiceEvent>,
        stream: Option<cpal::Stream>,
    ) -> Self {
        Self {
            sample_rate,
            bus,
            events,
            _stream: stream,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn current_frame(&self) -> u64 {
        self.lock().frame()
    }

    /// Seconds rendered so far.
    pub fn current_time(&self) -> f64 {
        self.current_frame() as f64 / self.sample_rate as f64
    }

    /// Render the bus into `out`, advancing the clock by `out.len()` frames.
    ///
    /// Meant for offline contexts; on a device context the stream is already
    /// pulling from the same bus.
    pub fn render(&self, out: &mut [f32]) {
        self.lock().render(out);
    }

    pub fn live_voices(&self) -> usize {
        self.lock().live_voices()
    }

    /// Next pending notification from the audio side, if any.
    pub fn pop_event(&mut self) -> Option<VoiceEvent> {
        EventReceiver::pop(&mut self.events)
    }

    /// Tap the mono mix for visualisation.
    ///
    /// Replaces any previous tap. Samples are dropped when the consumer falls
    /// behind.
    pub fn scope(&self, capacity: usize) -> Consumer<f32> {
        let (tx, rx) = RingBuffer::<f32>::new(capacity);
        self.lock().set_scope(tx);
        rx
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, OutputBus> {
        lock_bus(&self.bus)
    }

    pub(crate) fn shared_bus(&self) -> Arc<Mutex<OutputBus>> {
        Arc::clone(&self.bus)
    }
}
