//! # Operator Feedback
//!
//! Pure mapping from a [`ValidationOutcome`] to the tone, vibration pattern,
//! banner colour and message the operator should perceive. Nothing here
//! touches a speaker or a motor; the presenting layer performs the I/O.
//!
//! | Status | Tone | Haptic | Banner |
//! |--------|------|--------|--------|
//! | valid | 880 Hz, 120 ms | 60-30-60 | green |
//! | already_used | 220 Hz, 200 ms | 150 | amber |
//! | invalid | 150 Hz, 200 ms | 200-80-200 | red |
//! | error | 120 Hz, 250 ms | 200 | red |

use std::collections::VecDeque;

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::outcome::{ValidationDetails, ValidationOutcome, ValidationStatus};

/// Separator between the headline and each composed detail.
const DETAIL_SEPARATOR: &str = " — ";

const HAPTIC_VALID: &[u32] = &[60, 30, 60];
const HAPTIC_ALREADY_USED: &[u32] = &[150];
const HAPTIC_INVALID: &[u32] = &[200, 80, 200];
const HAPTIC_ERROR: &[u32] = &[200];

/// Number of recently fired outcome ids remembered by [`FeedbackLatch`].
const LATCH_MEMORY: usize = 16;

/// An audible cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    /// Pitch in hertz.
    pub frequency_hz: u32,
    /// Length in milliseconds.
    pub duration_ms: u32,
}

/// Banner colour behind the result message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// Entry allowed.
    Green,
    /// Ticket seen before.
    Amber,
    /// Rejected or failed.
    Red,
}

impl Banner {
    /// CSS-style hex colour.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Green => "#059669",
            Self::Amber => "#d97706",
            Self::Red => "#dc2626",
        }
    }
}

/// Everything the operator should perceive for one outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Outcome this feedback belongs to.
    pub outcome_id: Uuid,
    /// Classification the feedback was derived from.
    pub status: ValidationStatus,
    /// Audible cue.
    pub tone: Tone,
    /// Vibration pattern: alternating on/off durations in milliseconds.
    pub haptic: &'static [u32],
    /// Banner colour.
    pub banner: Banner,
    /// Banner text.
    pub message: String,
}

/// Map an outcome to its feedback. `offset` is the zone `usedAt` is shown in.
pub fn feedback_for(outcome: &ValidationOutcome, offset: &FixedOffset) -> Feedback {
    let (tone, haptic, banner) = match outcome.status {
        ValidationStatus::Valid => (tone(880, 120), HAPTIC_VALID, Banner::Green),
        ValidationStatus::AlreadyUsed => (tone(220, 200), HAPTIC_ALREADY_USED, Banner::Amber),
        ValidationStatus::Invalid => (tone(150, 200), HAPTIC_INVALID, Banner::Red),
        ValidationStatus::Error => (tone(120, 250), HAPTIC_ERROR, Banner::Red),
    };

    let message = match (&outcome.note, outcome.status) {
        (Some(note), ValidationStatus::Error) => note.clone(),
        _ => compose_message(outcome.status, outcome.details.as_ref(), offset),
    };

    Feedback {
        outcome_id: outcome.id,
        status: outcome.status,
        tone,
        haptic,
        banner,
        message,
    }
}

/// Headline plus whichever details are present, in fixed order.
///
/// Details are only composed for recognised tickets; `invalid` and `error`
/// render the bare headline.
pub fn compose_message(
    status: ValidationStatus,
    details: Option<&ValidationDetails>,
    offset: &FixedOffset,
) -> String {
    let head = status.headline();
    let Some(details) = details.filter(|_| status.is_recognised()) else {
        return head.to_string();
    };

    let mut parts = Vec::with_capacity(4);
    if let Some(gate) = non_blank(&details.gate_id) {
        parts.push(format!("Portão: {gate}"));
    }
    if let Some(used_at) = non_blank(&details.used_at) {
        parts.push(format!("Às: {}", format_time(used_at, offset)));
    }
    match (non_blank(&details.checker_name), non_blank(&details.checker_username)) {
        (Some(name), Some(user)) => parts.push(format!("Por: {name} (@{user})")),
        (Some(name), None) => parts.push(format!("Por: {name}")),
        (None, Some(user)) => parts.push(format!("Por: @{user}")),
        (None, None) => {}
    }
    if let Some(holder) = non_blank(&details.holder_name) {
        parts.push(format!("Titular: {holder}"));
    }

    if parts.is_empty() {
        head.to_string()
    } else {
        format!("{head}{DETAIL_SEPARATOR}{}", parts.join(DETAIL_SEPARATOR))
    }
}

/// Ensures feedback fires at most once per outcome.
#[derive(Debug, Default)]
pub struct FeedbackLatch {
    fired: VecDeque<Uuid>,
}

impl FeedbackLatch {
    /// Create an empty latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return feedback for `outcome` the first time it is seen, `None` after.
    pub fn fire(&mut self, outcome: &ValidationOutcome, offset: &FixedOffset) -> Option<Feedback> {
        if self.fired.contains(&outcome.id) {
            return None;
        }
        if self.fired.len() == LATCH_MEMORY {
            self.fired.pop_front();
        }
        self.fired.push_back(outcome.id);
        Some(feedback_for(outcome, offset))
    }
}

fn tone(frequency_hz: u32, duration_ms: u32) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn format_time(raw: &str, offset: &FixedOffset) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(offset).format("%H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}
