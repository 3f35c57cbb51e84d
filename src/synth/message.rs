use rtrb::{Consumer, Producer, PushError, RingBuffer};

/// Commands from the control context to the audio context.
///
/// The allocator decides which slot a note lands in; the engine only
/// executes. Everything here is `Copy` so the queue never allocates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceCommand {
    /// Bind `note` to `slot`, glide towards `frequency` and restart the envelope.
    Start { slot: usize, note: u8, frequency: f32 },
    /// Gate low on `slot`; the release tail keeps rendering.
    Release { slot: usize },
    /// Arm the click overlay.
    Click,
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<VoiceCommand>;
}

impl CommandReceiver for Consumer<VoiceCommand> {
    fn pop(&mut self) -> Option<VoiceCommand> {
        Consumer::pop(self).ok()
    }
}

/// Sending half, owned by the controller.
pub struct CommandSender {
    tx: Producer<VoiceCommand>,
}

impl CommandSender {
    /// Queue a command. A full queue drops it; the caller never blocks.
    pub fn send(&mut self, command: VoiceCommand) -> bool {
        match self.tx.push(command) {
            Ok(()) => true,
            Err(PushError::Full(dropped)) => {
                log::warn!("voice command queue full, dropping {dropped:?}");
                false
            }
        }
    }
}

/// Create a bounded command queue.
pub fn command_queue(capacity: usize) -> (CommandSender, Consumer<VoiceCommand>) {
    let (tx, rx) = RingBuffer::new(capacity.max(1));
    (CommandSender { tx }, rx)
}
