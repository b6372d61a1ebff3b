//! Native event queue with a string arena
//!
//! Text handles are allocated before the event that carries them is pushed
//! and are owned by that event. They are released once a later event is
//! polled, or once the queue runs dry.

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use bytemuck::Pod;

use super::native::NativeEvent;

#[derive(Debug)]
pub struct NativeQueue {
    events: VecDeque<(u64, NativeEvent)>,
    /// handle -> (owning event sequence number, text)
    texts: BTreeMap<u64, (u64, String)>,
    next_seq: u64,
    next_text: u64,
    started: Instant,
}

impl NativeQueue {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            texts: BTreeMap::new(),
            next_seq: 1,
            // 0 is the null handle
            next_text: 1,
            started: Instant::now(),
        }
    }

    /// Nanoseconds since the queue was created
    pub fn now_ns(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    /// Stores `text` for the next pushed event and returns its handle
    pub fn alloc_text(&mut self, text: impl Into<String>) -> u64 {
        let handle = self.next_text;
        self.next_text += 1;
        self.texts.insert(handle, (self.next_seq, text.into()));
        handle
    }

    pub fn push(&mut self, event: NativeEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push_back((seq, event));
    }

    pub fn push_payload<P: Pod>(&mut self, payload: &P) {
        self.push(NativeEvent::encode(payload));
    }

    pub fn pop(&mut self) -> Option<NativeEvent> {
        match self.events.pop_front() {
            Some((seq, event)) => {
                self.release_before(seq);
                Some(event)
            }
            None => {
                self.release_before(self.next_seq);
                None
            }
        }
    }

    pub fn resolve(&self, handle: u64) -> Option<String> {
        self.texts.get(&handle).map(|(_, text)| text.clone())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of live strings in the arena
    pub fn live_texts(&self) -> usize {
        self.texts.len()
    }

    fn release_before(&mut self, seq: u64) {
        while let Some(entry) = self.texts.first_entry()
            && entry.get().0 < seq
        {
            entry.remove();
        }
    }
}

impl Default for NativeQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::native::{CommonPayload, EventType, TextInputPayload};

    fn text_event(queue: &mut NativeQueue, text: &str) -> NativeEvent {
        let handle = queue.alloc_text(text);
        NativeEvent::encode(&TextInputPayload {
            common: CommonPayload::new(EventType::TEXT_INPUT, 0),
            window_id: 1,
            _padding: 0,
            text: handle,
        })
    }

    #[test]
    fn test_text_lives_until_next_poll() {
        let mut queue = NativeQueue::new();
        let first = text_event(&mut queue, "a");
        queue.push(first);
        let second = text_event(&mut queue, "b");
        queue.push(second);

        let event = queue.pop().unwrap();
        let handle = event.read::<TextInputPayload>().text;
        assert_eq!(queue.resolve(handle).as_deref(), Some("a"));

        let event = queue.pop().unwrap();
        assert_eq!(queue.resolve(handle), None);
        let handle = event.read::<TextInputPayload>().text;
        assert_eq!(queue.resolve(handle).as_deref(), Some("b"));

        assert!(queue.pop().is_none());
        assert_eq!(queue.live_texts(), 0);
    }

    #[test]
    fn test_null_handle_never_resolves() {
        let queue = NativeQueue::new();
        assert_eq!(queue.resolve(0), None);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = NativeQueue::new();
        for ts in 0..4 {
            queue.push_payload(&CommonPayload::new(EventType::QUIT, ts));
        }
        let stamps: Vec<u64> = std::iter::from_fn(|| queue.pop())
            .map(|e| e.read::<CommonPayload>().timestamp)
            .collect();
        assert_eq!(stamps, vec![0, 1, 2, 3]);
    }
}
