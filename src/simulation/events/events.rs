use std::collections::VecDeque;

use serde::Serialize;

/// Discrete notifications for gameplay/UI collaborators
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SimEvent {
    /// A fire-once activation request was served on `tick`
    #[serde(rename_all = "camelCase")]
    ActivationCompleted { tick: u64, activated: u32 },
    /// Dynamic fraction first reached the completion threshold
    #[serde(rename_all = "camelCase")]
    CompletionReached { tick: u64, fraction: f32 },
}

#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<SimEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: SimEvent) {
        self.pending.push_back(event);
    }

    pub fn pop(&mut self) -> Option<SimEvent> {
        self.pending.pop_front()
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
