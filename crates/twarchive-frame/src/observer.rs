//! Child-side resize reporting.
//!
//! The agent owns the document's single size observer. It is created on the
//! first [`ResizeObservationAgent::start`] and lives as long as the agent;
//! navigation tears both down.
//!
//! Callers that change the document height on purpose (the explanation
//! toggle) bracket the change with `stop`/`start` and send one explicit
//! report afterwards. Without the bracket the observer fires on every frame
//! of the CSS transition. That is only noise: the host's height update is
//! idempotent per report.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::host::{ChildDocument, ExplanationPanel, RootObserver};
use crate::identity::FrameIdentity;
use crate::message::{FrameMessage, LogLevel, ResizeReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObservationState {
    #[default]
    Stopped,
    Observing,
}

/// The reporting half of the agent, handed to the platform observer so its
/// callback reports through the same observing check as the agent.
#[derive(Debug, Clone)]
pub struct SizeReporter {
    identity: FrameIdentity,
    state: Rc<Cell<ObservationState>>,
}

impl SizeReporter {
    fn new(identity: FrameIdentity) -> Self {
        Self {
            identity,
            state: Rc::default(),
        }
    }

    #[must_use]
    pub fn identity(&self) -> &FrameIdentity {
        &self.identity
    }

    #[must_use]
    pub fn state(&self) -> ObservationState {
        self.state.get()
    }

    /// Observer callback entry point. Reports only while observing.
    pub fn on_size_observed<D: ChildDocument + ?Sized>(&self, document: &D) -> Result<()> {
        if self.state() != ObservationState::Observing {
            trace!(
                target: "twarchive_frame::observer",
                frame = %self.identity,
                "size change while stopped; not reported"
            );
            return Ok(());
        }
        self.report(document)
    }

    /// Send one resize report with the current viewport size.
    pub fn report<D: ChildDocument + ?Sized>(&self, document: &D) -> Result<()> {
        let (width, height) = document.viewport_size();
        let message = FrameMessage::Resize(ResizeReport::new(&self.identity, width, height));
        trace!(
            target: "twarchive_frame::observer",
            frame = %self.identity,
            width,
            height,
            "reporting size to parent"
        );
        document.post_to_parent(&message)
    }
}

pub struct ResizeObservationAgent<D: ChildDocument> {
    reporter: SizeReporter,
    document: D,
    observer: Option<D::Observer>,
}

impl<D: ChildDocument> ResizeObservationAgent<D> {
    #[must_use]
    pub fn new(identity: FrameIdentity, document: D) -> Self {
        Self {
            reporter: SizeReporter::new(identity),
            document,
            observer: None,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &FrameIdentity {
        self.reporter.identity()
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    #[must_use]
    pub fn state(&self) -> ObservationState {
        self.reporter.state()
    }

    /// Begin observing the document root. No-op while already observing.
    pub fn start(&mut self) -> Result<()> {
        if self.state() == ObservationState::Observing {
            return Ok(());
        }
        if self.observer.is_none() {
            self.observer = Some(self.document.create_observer(self.reporter.clone())?);
            debug!(
                target: "twarchive_frame::observer",
                frame = %self.identity(),
                "created resize observer"
            );
        }
        if let Some(observer) = &self.observer {
            observer.observe()?;
        }
        self.reporter.state.set(ObservationState::Observing);
        Ok(())
    }

    /// Stop observing. No-op while already stopped.
    pub fn stop(&mut self) -> Result<()> {
        if self.state() == ObservationState::Stopped {
            return Ok(());
        }
        if let Some(observer) = &self.observer {
            observer.unobserve()?;
        }
        self.reporter.state.set(ObservationState::Stopped);
        Ok(())
    }

    pub fn on_size_observed(&self) -> Result<()> {
        self.reporter.on_size_observed(&self.document)
    }

    pub fn report_size(&self) -> Result<()> {
        self.reporter.report(&self.document)
    }

    /// Flip the explanation panel, keeping the observer quiet during the
    /// transition, then report the settled size once.
    pub fn toggle_explanation(&mut self, panel: &impl ExplanationPanel) -> Result<()> {
        self.stop()?;
        panel.set_shown(!panel.is_shown());
        self.start()?;
        self.report_size()
    }

    /// Forward a log line to the host; the child's own console is only
    /// visible when inspecting the frame.
    pub fn log_to_parent(&self, level: LogLevel, message: &str) -> Result<()> {
        let message = FrameMessage::ChildLog {
            level: level.as_str().to_string(),
            message: format!("frame {}: {message}", self.identity()),
        };
        self.document.post_to_parent(&message)
    }
}
