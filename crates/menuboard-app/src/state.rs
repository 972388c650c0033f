// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

use crate::ids::{CategoryId, TransitionToken};
use crate::layout::{DEFAULT_SCROLL_OFFSET_PERCENT, TabStrip};

pub const DEFAULT_SWITCH_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPhase {
    Idle,
    Ready {
        active: CategoryId,
    },
    Switching {
        from: CategoryId,
        to: CategoryId,
        token: TransitionToken,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabCommand {
    /// A catalog was built. Replaces whatever was shown before.
    Load {
        initial: CategoryId,
        strip: TabStrip,
    },
    /// The visitor clicked or tapped a tab.
    Activate(CategoryId),
    /// The switch delay for `token` elapsed.
    Settle(TransitionToken),
    /// The viewport or tab strip was re-measured.
    Resize(TabStrip),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    Ready(CategoryId),
    FadeOut {
        from: CategoryId,
        to: CategoryId,
    },
    /// The host must send `Settle(token)` after `delay`.
    SwitchScheduled {
        token: TransitionToken,
        delay: Duration,
    },
    SwitchCancelled(TransitionToken),
    Rendered(CategoryId),
    ActiveTabChanged(CategoryId),
    Scrolled(f64),
    FadeIn,
    SwipeHintChanged(bool),
}

/// Owns which category is displayed and every transition between them.
///
/// `Idle -> Ready -> Switching -> Ready`. A new activation while a switch is
/// pending cancels the pending one and restarts toward the new target; the
/// cancelled token is then ignored if it ever settles.
#[derive(Debug, Clone, PartialEq)]
pub struct TabController {
    phase: TabPhase,
    strip: Option<TabStrip>,
    last_token: TransitionToken,
    switch_delay: Duration,
    scroll_offset_percent: f64,
    scroll_left: f64,
    swipe_hint: bool,
}

impl Default for TabController {
    fn default() -> Self {
        Self::new(DEFAULT_SWITCH_DELAY, DEFAULT_SCROLL_OFFSET_PERCENT)
    }
}

impl TabController {
    pub fn new(switch_delay: Duration, scroll_offset_percent: f64) -> Self {
        Self {
            phase: TabPhase::Idle,
            strip: None,
            last_token: TransitionToken::new(0),
            switch_delay,
            scroll_offset_percent,
            scroll_left: 0.0,
            swipe_hint: false,
        }
    }

    pub fn phase(&self) -> TabPhase {
        self.phase
    }

    /// Category whose content is currently on screen.
    pub fn displayed(&self) -> Option<CategoryId> {
        match self.phase {
            TabPhase::Idle => None,
            TabPhase::Ready { active } => Some(active),
            TabPhase::Switching { from, .. } => Some(from),
        }
    }

    pub fn content_visible(&self) -> bool {
        matches!(self.phase, TabPhase::Ready { .. })
    }

    pub fn swipe_hint(&self) -> bool {
        self.swipe_hint
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn switch_delay(&self) -> Duration {
        self.switch_delay
    }

    pub fn dispatch(&mut self, command: TabCommand) -> Vec<TabEvent> {
        match command {
            TabCommand::Load { initial, strip } => self.load(initial, strip),
            TabCommand::Activate(target) => self.activate(target),
            TabCommand::Settle(token) => self.settle(token),
            TabCommand::Resize(strip) => self.resize(strip),
        }
    }

    fn load(&mut self, initial: CategoryId, strip: TabStrip) -> Vec<TabEvent> {
        let mut events = Vec::new();
        if let TabPhase::Switching { token, .. } = self.phase {
            events.push(TabEvent::SwitchCancelled(token));
        }

        let active = if initial.get() < strip.tab_widths.len() {
            initial
        } else {
            CategoryId::new(0)
        };
        self.phase = TabPhase::Ready { active };
        self.swipe_hint = strip.needs_swipe_hint();
        self.scroll_left = strip.scroll_target(active, self.scroll_offset_percent);
        self.strip = Some(strip);

        events.extend([
            TabEvent::Ready(active),
            TabEvent::Rendered(active),
            TabEvent::ActiveTabChanged(active),
            TabEvent::Scrolled(self.scroll_left),
            TabEvent::SwipeHintChanged(self.swipe_hint),
        ]);
        events
    }

    fn activate(&mut self, target: CategoryId) -> Vec<TabEvent> {
        if !self.knows(target) {
            return Vec::new();
        }

        match self.phase {
            TabPhase::Idle => Vec::new(),
            TabPhase::Ready { active } if active == target => Vec::new(),
            TabPhase::Ready { active } => {
                let token = self.next_token();
                self.phase = TabPhase::Switching {
                    from: active,
                    to: target,
                    token,
                };
                vec![
                    TabEvent::FadeOut {
                        from: active,
                        to: target,
                    },
                    TabEvent::SwitchScheduled {
                        token,
                        delay: self.switch_delay,
                    },
                ]
            }
            TabPhase::Switching { to, .. } if to == target => Vec::new(),
            TabPhase::Switching { from, token, .. } if from == target => {
                self.phase = TabPhase::Ready { active: from };
                vec![TabEvent::SwitchCancelled(token), TabEvent::FadeIn]
            }
            TabPhase::Switching { from, token, .. } => {
                let next = self.next_token();
                self.phase = TabPhase::Switching {
                    from,
                    to: target,
                    token: next,
                };
                vec![
                    TabEvent::SwitchCancelled(token),
                    TabEvent::SwitchScheduled {
                        token: next,
                        delay: self.switch_delay,
                    },
                ]
            }
        }
    }

    fn settle(&mut self, settled: TransitionToken) -> Vec<TabEvent> {
        let TabPhase::Switching { to, token, .. } = self.phase else {
            return Vec::new();
        };
        if token != settled {
            return Vec::new();
        }

        self.phase = TabPhase::Ready { active: to };
        if let Some(strip) = &self.strip {
            self.scroll_left = strip.scroll_target(to, self.scroll_offset_percent);
        }
        vec![
            TabEvent::Rendered(to),
            TabEvent::ActiveTabChanged(to),
            TabEvent::Scrolled(self.scroll_left),
            TabEvent::FadeIn,
        ]
    }

    fn resize(&mut self, strip: TabStrip) -> Vec<TabEvent> {
        let hint = strip.needs_swipe_hint();
        self.scroll_left = self.scroll_left.min(strip.max_scroll());
        self.strip = Some(strip);

        if hint == self.swipe_hint {
            return Vec::new();
        }
        self.swipe_hint = hint;
        vec![TabEvent::SwipeHintChanged(hint)]
    }

    fn knows(&self, id: CategoryId) -> bool {
        self.strip
            .as_ref()
            .is_some_and(|strip| id.get() < strip.tab_widths.len())
    }

    fn next_token(&mut self) -> TransitionToken {
        self.last_token = self.last_token.next();
        self.last_token
    }
}
