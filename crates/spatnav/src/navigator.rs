#![forbid(unsafe_code)]

//! Navigator: owns the active selection and drives every side effect.
//!
//! The navigator is the only writer of [`SelectionState`]. Queries go
//! through [`Resolver`] and never mutate anything; the navigator applies
//! their result, re-syncs the [`Highlight`], and asks the host to scroll,
//! activate or focus through [`Effects`].
//!
//! # States
//!
//! ```text
//!   no-selection --move (default found)--> has-selection
//!   has-selection --move (target found)--> has-selection
//!   has-selection --scope changed / trusted click--> no-selection
//!   no-selection --settle delay elapsed--> default selection
//! ```
//!
//! Delays are driven by [`Navigator::poll`], which the host calls from its
//! event loop (or after advancing a lab clock in tests).

use spatnav_core::{
    Capability, Clock, Direction, Effects, ElementId, Host, InputSource, Markers, NavCommand,
    NavConfig, NavEvent, NavigableElement, ScrollRequest,
};

use crate::highlight::{Highlight, HighlightState};
use crate::registry::Registry;
use crate::resolve::Resolver;
use crate::schedule::{DeferredQueue, Task, TaskId};

/// Zero or one active element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    active: Option<NavigableElement>,
}

impl SelectionState {
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<NavigableElement> {
        self.active
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<ElementId> {
        self.active.map(|el| el.id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    fn set(&mut self, element: NavigableElement) -> Option<NavigableElement> {
        self.active.replace(element)
    }

    fn clear(&mut self) -> Option<NavigableElement> {
        self.active.take()
    }
}

/// Directional focus navigator.
#[derive(Debug, Clone)]
pub struct Navigator {
    config: NavConfig,
    clock: Clock,
    selection: SelectionState,
    queue: DeferredQueue,
    highlight: Highlight,
}

impl Navigator {
    #[must_use]
    pub fn new(config: NavConfig) -> Self {
        Self {
            clock: Clock::default(),
            selection: SelectionState::default(),
            queue: DeferredQueue::new(config.reentrancy),
            highlight: Highlight::new(config.highlight_padding),
            config,
        }
    }

    /// Read time from `clock` instead of the wall clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<ElementId> {
        self.selection.current()
    }

    #[must_use]
    pub fn highlight(&self) -> &HighlightState {
        self.highlight.state()
    }

    #[must_use]
    pub fn pending(&self) -> &DeferredQueue {
        &self.queue
    }

    /// Resolver bound to this navigator's configuration.
    #[must_use]
    pub fn resolver<'a, H: Host>(&'a self, host: &'a H) -> Resolver<'a, H> {
        Resolver::new(host, &self.config)
    }

    /// Make `id` active if it is navigable in the current scope.
    pub fn set_active<H: Host>(&mut self, host: &H, id: ElementId) -> bool {
        let snapshot = Registry::new(host).snapshot(None);
        let Some(element) = snapshot.get(id).copied() else {
            return false;
        };
        self.selection.set(element);
        self.sync_highlight(host);
        true
    }

    /// Move the selection one step in `direction`.
    ///
    /// With no selection the default selection is established first and the
    /// move continues from it. Returns the newly active element, or `None`
    /// when nothing changed.
    pub fn move_focus<H, E>(
        &mut self,
        host: &H,
        effects: &mut E,
        direction: Direction,
    ) -> Option<ElementId>
    where
        H: Host,
        E: Effects + ?Sized,
    {
        let active = match self.selection.current() {
            Some(id) => id,
            None => {
                let Some(id) = self.default_selection(host) else {
                    tracing::debug!(
                        message = "nav.move.none",
                        direction = direction.as_str(),
                        reason = "no_default"
                    );
                    return None;
                };
                id
            }
        };

        let resolution = self.resolver(host).explain(active, direction);
        let Some(resolution) = resolution else {
            tracing::debug!(
                message = "nav.move.none",
                direction = direction.as_str(),
                from = active.get(),
                reason = "no_box"
            );
            return None;
        };
        let target = resolution
            .target()
            .and_then(|id| resolution.snapshot.get(id).copied());
        let Some(target) = target else {
            tracing::debug!(
                message = "nav.move.none",
                direction = direction.as_str(),
                from = active.get(),
                reason = "no_candidate"
            );
            return None;
        };

        self.selection.set(target);
        self.highlight.set_pressed(None);
        self.sync_highlight(host);
        tracing::debug!(
            message = "nav.move",
            direction = direction.as_str(),
            from = active.get(),
            to = target.id.get(),
            rule = resolution.verdict.rule.as_str()
        );

        self.scroll_into_view(host, effects, target.id, resolution.snapshot.scope.root);
        Some(target.id)
    }

    fn scroll_into_view<H, E>(
        &self,
        host: &H,
        effects: &mut E,
        target: ElementId,
        scope_root: ElementId,
    ) where
        H: Host,
        E: Effects + ?Sized,
    {
        let parent = host.parent(target);
        if parent == Some(scope_root) || parent == Some(host.document_root()) {
            return;
        }
        if host.closest_marked(target, Markers::NO_SCROLL).is_some() {
            tracing::trace!(message = "nav.scroll", target = target.get(), skipped = true);
            return;
        }
        let proxy = host.closest_marked(target, Markers::SCROLL_PROXY);
        let request = ScrollRequest::centered(proxy.unwrap_or(target));
        tracing::debug!(
            message = "nav.scroll",
            target = request.target.get(),
            proxied = proxy.is_some()
        );
        effects.scroll_into_view(request);
    }

    /// Queue activation of the current selection after the activation
    /// delay. Returns `false` with no selection or when the re-entrancy
    /// policy drops the request.
    pub fn select(&mut self) -> bool {
        let Some(active) = self.selection.active() else {
            return false;
        };
        let due = self.clock.now() + self.config.activation_delay();
        let queued: Option<TaskId> = self.queue.schedule(Task::Activate(active), due);
        tracing::debug!(
            message = "nav.select",
            element = active.id.get(),
            toggle = matches!(active.capability, Capability::Toggle { .. }),
            delay_ms = self.config.activation_delay_ms,
            queued = queued.is_some()
        );
        queued.is_some()
    }

    /// Establish the default selection for the current scope.
    ///
    /// Inside a shown overlay this is its `DEFAULT_SELECTION` element, or
    /// else its first navigable element. Without an overlay it is the
    /// current (not `INACTIVE`) entry of the navigation sidebar.
    pub fn default_selection<H: Host>(&mut self, host: &H) -> Option<ElementId> {
        let registry = Registry::new(host);
        let (element, source) = match host.topmost_shown() {
            Some(overlay) => {
                let marked = host
                    .descendants(overlay)
                    .into_iter()
                    .find(|id| host.markers(*id).contains(Markers::DEFAULT_SELECTION));
                match marked {
                    Some(id) => (Some(registry.classify(id)), "overlay_default"),
                    None => (
                        registry.enumerate(Some(overlay)).into_iter().next(),
                        "overlay_first",
                    ),
                }
            }
            None => (
                self.sidebar_current(host).map(|id| registry.classify(id)),
                "sidebar",
            ),
        };

        let Some(element) = element else {
            tracing::debug!(message = "nav.default", found = false, source);
            return None;
        };
        self.selection.set(element);
        self.sync_highlight(host);
        tracing::debug!(
            message = "nav.default",
            found = true,
            element = element.id.get(),
            source
        );
        Some(element.id)
    }

    fn sidebar_current<H: Host>(&self, host: &H) -> Option<ElementId> {
        let root = host.document_root();
        host.descendants(root)
            .into_iter()
            .filter(|id| host.markers(*id).contains(Markers::NAV_SIDEBAR))
            .flat_map(|sidebar| host.descendants(sidebar))
            .find(|id| !host.markers(*id).contains(Markers::INACTIVE))
    }

    /// React to a host notification.
    pub fn handle_event<H: Host>(&mut self, host: &H, event: NavEvent) {
        match event {
            NavEvent::ScopeChanged => {
                let Some(previous) = self.selection.clear() else {
                    tracing::debug!(message = "nav.scope_changed", had_selection = false);
                    return;
                };
                self.highlight.hide();
                let due = self.clock.now() + self.config.settle_delay();
                let queued = self.queue.schedule(Task::Resettle, due);
                tracing::debug!(
                    message = "nav.scope_changed",
                    had_selection = true,
                    previous = previous.id.get(),
                    settle_ms = self.config.settle_delay_ms,
                    queued = queued.is_some()
                );
            }
            NavEvent::ViewportResized(_) | NavEvent::ViewportScrolled => {
                self.sync_highlight(host);
            }
            NavEvent::PointerClick { trusted } => {
                if trusted && self.selection.clear().is_some() {
                    self.highlight.hide();
                }
            }
        }
    }

    /// Dispatch a decoded input command.
    pub fn handle_command<H, E>(&mut self, host: &H, effects: &mut E, command: NavCommand) -> bool
    where
        H: Host,
        E: Effects + ?Sized,
    {
        match command {
            NavCommand::Move(direction) => self.move_focus(host, effects, direction).is_some(),
            NavCommand::Select => self.select(),
        }
    }

    /// Run every deferred task that is due. Returns how many ran.
    pub fn poll<H, E>(&mut self, host: &H, effects: &mut E) -> usize
    where
        H: Host,
        E: Effects + ?Sized,
    {
        let due = self.queue.take_due(self.clock.now());
        let count = due.len();
        for task in due {
            match task {
                Task::Activate(element) => match element.capability {
                    Capability::Toggle { switch } => effects.toggle(switch),
                    Capability::Generic => {
                        effects.activate(element.id);
                        effects.focus(element.id);
                    }
                },
                Task::Resettle => {
                    self.default_selection(host);
                }
            }
        }
        count
    }

    /// Show the pressed cue for `source` on the highlight.
    pub fn press(&mut self, source: InputSource) {
        self.highlight.set_pressed(Some(source));
    }

    /// Recompute the highlight from the current selection.
    pub fn sync_highlight<H: Host>(&mut self, host: &H) -> HighlightState {
        *self.highlight.sync(host, self.selection.current())
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}
