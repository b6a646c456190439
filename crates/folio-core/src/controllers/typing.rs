//! Typing text effect.
//!
//! ```text
//!            150ms                 2000ms        immediate
//! Typing(i) ───────▶ Typing(i+1)   Typing(n) ──▶ PausedFull ──▶ Deleting(n)
//!
//!              100ms                    1000ms         immediate
//! Deleting(i) ───────▶ Deleting(i-1)   Deleting(0) ──▶ PausedEmpty ──▶ Typing(0)
//! ```
//!
//! The machine is pure; [`TypingAnimation`] schedules it on host timers.

use tracing::{debug, trace};

use super::Ctx;
use crate::config::{Selectors, TypingConfig};
use crate::error::{FolioError, FolioResult};
use crate::host::{ElementId, Host, TimerId};
use crate::timers::TimerTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingState {
    /// `i` characters shown, typing forward
    Typing(usize),
    /// Full text shown, waiting to delete
    PausedFull,
    /// `i` characters shown, deleting
    Deleting(usize),
    /// Nothing shown, waiting to type again
    PausedEmpty,
}

/// Result of one [`TypingMachine::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// Whether the displayed text changed
    pub text_changed: bool,
    /// Delay before the next advance
    pub delay_ms: u32,
}

#[derive(Debug, Clone)]
pub struct TypingMachine {
    chars: Vec<char>,
    state: TypingState,
    timing: TypingConfig,
}

impl TypingMachine {
    pub fn new(timing: &TypingConfig) -> Self {
        Self {
            chars: timing.text.chars().collect(),
            state: TypingState::Typing(0),
            timing: timing.clone(),
        }
    }

    pub fn state(&self) -> TypingState {
        self.state
    }

    /// Number of characters in the target text.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of characters currently displayed.
    pub fn shown(&self) -> usize {
        match self.state {
            TypingState::Typing(i) | TypingState::Deleting(i) => i,
            TypingState::PausedFull => self.chars.len(),
            TypingState::PausedEmpty => 0,
        }
    }

    /// Currently displayed prefix.
    pub fn text(&self) -> String {
        self.chars[..self.shown()].iter().collect()
    }

    /// Perform the current state's action and move to the next state.
    ///
    /// Immediate transitions are taken within the same call, so the returned
    /// delay is always the wait before the next visible step or pause.
    pub fn advance(&mut self) -> Advance {
        let n = self.chars.len();
        loop {
            match self.state {
                TypingState::Typing(i) if i < n => {
                    self.state = TypingState::Typing(i + 1);
                    return Advance {
                        text_changed: true,
                        delay_ms: self.timing.type_ms,
                    };
                }
                TypingState::Typing(_) => {
                    self.state = TypingState::PausedFull;
                    return Advance {
                        text_changed: false,
                        delay_ms: self.timing.hold_full_ms,
                    };
                }
                TypingState::PausedFull => self.state = TypingState::Deleting(n),
                TypingState::Deleting(i) if i > 0 => {
                    self.state = TypingState::Deleting(i - 1);
                    return Advance {
                        text_changed: true,
                        delay_ms: self.timing.delete_ms,
                    };
                }
                TypingState::Deleting(_) => {
                    self.state = TypingState::PausedEmpty;
                    return Advance {
                        text_changed: false,
                        delay_ms: self.timing.hold_empty_ms,
                    };
                }
                TypingState::PausedEmpty => self.state = TypingState::Typing(0),
            }
        }
    }

    /// Advances in one full cycle.
    pub fn cycle_len(&self) -> usize {
        2 * self.chars.len() + 2
    }
}

/// Typing effect bound to the page's typing element.
#[derive(Debug)]
pub struct TypingAnimation {
    element: ElementId,
    machine: TypingMachine,
    pending: Option<TimerId>,
}

impl TypingAnimation {
    pub fn new<H: Host>(
        ctx: &mut Ctx<'_, H>,
        selectors: &Selectors,
        config: &TypingConfig,
    ) -> FolioResult<Self> {
        let element = ctx
            .host
            .query(&selectors.typing_text)
            .ok_or_else(|| FolioError::missing(&selectors.typing_text))?;

        let pending = ctx
            .timers
            .after(ctx.host, config.start_delay_ms, TimerTask::TypingStep);
        debug!(chars = config.text.chars().count(), "typing animation scheduled");

        Ok(Self {
            element,
            machine: TypingMachine::new(config),
            pending: Some(pending),
        })
    }

    pub fn machine(&self) -> &TypingMachine {
        &self.machine
    }

    pub fn on_step<H: Host>(&mut self, ctx: &mut Ctx<'_, H>) {
        let step = self.machine.advance();
        if step.text_changed {
            ctx.host.set_text(self.element, &self.machine.text());
        }
        trace!(state = ?self.machine.state(), delay = step.delay_ms, "typing step");
        self.pending = Some(
            ctx.timers
                .after(ctx.host, step.delay_ms, TimerTask::TypingStep),
        );
    }

    /// Cancel the pending step.
    pub fn teardown<H: Host>(&mut self, ctx: &mut Ctx<'_, H>) {
        if let Some(id) = self.pending.take() {
            ctx.timers.cancel(ctx.host, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(text: &str) -> TypingMachine {
        TypingMachine::new(&TypingConfig {
            text: text.into(),
            ..TypingConfig::default()
        })
    }

    #[test]
    fn test_types_forward_then_pauses() {
        let mut m = machine("abc");
        let mut delays = Vec::new();
        let mut texts = Vec::new();
        for _ in 0..4 {
            delays.push(m.advance().delay_ms);
            texts.push(m.text());
        }
        assert_eq!(delays, vec![150, 150, 150, 2000]);
        assert_eq!(texts, vec!["a", "ab", "abc", "abc"]);
        assert_eq!(m.state(), TypingState::PausedFull);
    }

    #[test]
    fn test_deletes_after_full_pause() {
        let mut m = machine("ab");
        for _ in 0..3 {
            m.advance();
        }
        let step = m.advance();
        assert_eq!(m.state(), TypingState::Deleting(1));
        assert!(step.text_changed);
        assert_eq!(step.delay_ms, 100);
        assert_eq!(m.text(), "a");

        m.advance();
        assert_eq!(m.text(), "");
        let pause = m.advance();
        assert_eq!(m.state(), TypingState::PausedEmpty);
        assert_eq!(pause.delay_ms, 1000);
        assert!(!pause.text_changed);

        m.advance();
        assert_eq!(m.state(), TypingState::Typing(1));
        assert_eq!(m.text(), "a");
    }

    #[test]
    fn test_multibyte_text() {
        let mut m = machine("añ✓");
        m.advance();
        m.advance();
        assert_eq!(m.text(), "añ");
        m.advance();
        assert_eq!(m.text(), "añ✓");
    }

    #[test]
    fn test_empty_text_only_pauses() {
        let mut m = machine("");
        let delays: Vec<u32> = (0..4).map(|_| m.advance().delay_ms).collect();
        assert_eq!(delays, vec![2000, 1000, 2000, 1000]);
        assert_eq!(m.text(), "");
    }
}
