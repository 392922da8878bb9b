pub mod events;
pub mod keymap;

use self::events::{InputEvent, Key};
use crossbeam_channel::{unbounded, Receiver, Sender};
use relay_schema::Millis;

/// Key events on their way from an input source to the game loop, which
/// drains them once per tick.
pub struct InputQueue {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
}

/// Producer half of an [`InputQueue`]; clone it into polling threads.
#[derive(Clone)]
pub struct InputSource {
    tx: Sender<InputEvent>,
}

impl InputSource {
    /// Returns false once the queue has been dropped.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn press(&self, key: Key, timestamp_ms: Millis) -> bool {
        self.send(InputEvent::down(key, timestamp_ms))
    }

    pub fn release(&self, key: Key, timestamp_ms: Millis) -> bool {
        self.send(InputEvent::up(key, timestamp_ms))
    }
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn source(&self) -> InputSource {
        InputSource {
            tx: self.tx.clone(),
        }
    }

    pub fn push(&self, event: InputEvent) {
        // The queue owns a receiver, so this cannot disconnect.
        let _ = self.tx.send(event);
    }

    pub fn pop(&self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }

    /// Everything queued so far, in arrival order.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
