//! # Terminal Presenter
//!
//! Renders outcomes for the operator: a banner line with the composed
//! message and, optionally, the terminal bell standing in for the tone.
//! Each outcome is shown once even if it is handed over again.

use std::io::{self, Write};

use chrono::FixedOffset;

use gatepass_core::{feedback_for, Banner, FeedbackLatch, HistoryEntry, ValidationOutcome};
use gatepass_scanner::{Disposition, DropReason};

/// Writes operator feedback to a terminal.
pub struct Presenter<W> {
    out: W,
    offset: FixedOffset,
    latch: FeedbackLatch,
    bell: bool,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, offset: FixedOffset, bell: bool) -> Self {
        Self {
            out,
            offset,
            latch: FeedbackLatch::new(),
            bell,
        }
    }

    /// Show `outcome` unless it was already shown.
    pub fn outcome(&mut self, outcome: &ValidationOutcome) -> io::Result<()> {
        let Some(feedback) = self.latch.fire(outcome, &self.offset) else {
            return Ok(());
        };
        tracing::debug!(
            status = %feedback.status,
            tone_hz = feedback.tone.frequency_hz,
            tone_ms = feedback.tone.duration_ms,
            haptic = ?feedback.haptic,
            banner = feedback.banner.hex(),
            "feedback"
        );
        if self.bell {
            write!(self.out, "\x07")?;
        }
        writeln!(self.out, "{} {}", label(feedback.banner), feedback.message)?;
        self.out.flush()
    }

    pub fn disposition(&mut self, disposition: &Disposition) -> io::Result<()> {
        match disposition {
            Disposition::Completed(outcome) | Disposition::Rejected(outcome) => {
                self.outcome(outcome)
            }
            // The caller clears the session and tells the operator.
            Disposition::ReauthRequired => Ok(()),
            Disposition::Dropped(reason) => {
                let reason = match reason {
                    DropReason::Empty => "empty",
                    DropReason::Busy => "busy",
                    DropReason::CoolingDown => "cooling_down",
                    DropReason::Duplicate => "duplicate",
                };
                tracing::debug!(reason, "scan dropped");
                Ok(())
            }
        }
    }

    /// Recent results, newest first.
    pub fn history(&mut self, entries: &[HistoryEntry]) -> io::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "Últimas validações:")?;
        for entry in entries {
            let feedback = feedback_for(&entry.outcome, &self.offset);
            writeln!(
                self.out,
                "  {}  {}",
                entry.recorded_at.with_timezone(&self.offset).format("%H:%M:%S"),
                feedback.message
            )?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn label(banner: Banner) -> &'static str {
    match banner {
        Banner::Green => "[VERDE]",
        Banner::Amber => "[ÂMBAR]",
        Banner::Red => "[VERMELHO]",
    }
}
