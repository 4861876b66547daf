#![forbid(unsafe_code)]

//! [`Effects`] sink that records every request in order.

use spatnav_core::{Effects, ElementId, ScrollRequest};

/// One recorded outward action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Toggle(ElementId),
    Activate(ElementId),
    Focus(ElementId),
    Scroll(ScrollRequest),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingEffects {
    log: Vec<Effect>,
}

impl RecordingEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.log
    }

    /// Drain the log.
    pub fn take(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.log)
    }

    /// Scroll requests only, in order.
    #[must_use]
    pub fn scrolls(&self) -> Vec<ScrollRequest> {
        self.log
            .iter()
            .filter_map(|effect| match effect {
                Effect::Scroll(request) => Some(*request),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

impl Effects for RecordingEffects {
    fn toggle(&mut self, switch: ElementId) {
        self.log.push(Effect::Toggle(switch));
    }

    fn activate(&mut self, id: ElementId) {
        self.log.push(Effect::Activate(id));
    }

    fn focus(&mut self, id: ElementId) {
        self.log.push(Effect::Focus(id));
    }

    fn scroll_into_view(&mut self, request: ScrollRequest) {
        self.log.push(Effect::Scroll(request));
    }
}
