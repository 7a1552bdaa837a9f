//! Host-side message routing.
//!
//! Every value posted to the top-level window lands here, including traffic
//! that has nothing to do with embeds. Classification decides what happens:
//!
//! | Inbound             | Action                                  |
//! |---------------------|-----------------------------------------|
//! | foreign (no `kind`) | nothing, not even a log line            |
//! | `resize`            | [`FrameHeightResolver::apply_resize`]   |
//! | `display-data-uri`  | marker address + full-page render       |
//! | `child-log`         | forwarded to the [`LogSink`]            |
//! | unknown or malformed| one error on the [`LogSink`]            |
//!
//! No handler fails the page: errors from the platform become one error log
//! and a [`DispatchOutcome::Failed`].
//!
//! Sender origin is not checked.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::FrameConfig;
use crate::host::{AddressBar, DocumentSurface, FrameHost, LogSink};
use crate::message::{FrameMessage, Inbound, LogLevel};
use crate::render::TopLevelDataUriRenderer;
use crate::resolver::{FrameHeightResolver, ResizeSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Ignored,
    Resized(ResizeSummary),
    DisplayedDataUri,
    Logged,
    /// Unknown kind or undecodable payload; logged as an error.
    Rejected,
    /// A handler hit a platform error; logged as an error.
    Failed,
}

pub struct HostMessageDispatcher<H, L> {
    host: H,
    sink: L,
    config: FrameConfig,
    resolver: FrameHeightResolver,
    renderer: TopLevelDataUriRenderer,
}

impl<H, L> HostMessageDispatcher<H, L>
where
    H: FrameHost + AddressBar + DocumentSurface,
    L: LogSink,
{
    #[must_use]
    pub fn new(host: H, sink: L, config: FrameConfig) -> Self {
        let resolver = FrameHeightResolver::new(config.clone());
        Self {
            host,
            sink,
            config,
            resolver,
            renderer: TopLevelDataUriRenderer::default(),
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn sink(&self) -> &L {
        &self.sink
    }

    #[must_use]
    pub fn renderer(&self) -> &TopLevelDataUriRenderer {
        &self.renderer
    }

    pub fn on_message(&self, raw: &Value) -> DispatchOutcome {
        match Inbound::classify(raw) {
            Inbound::Foreign => DispatchOutcome::Ignored,
            Inbound::Message(message) => self.dispatch(message),
            Inbound::Unrecognized { kind } => {
                self.sink.log(
                    LogLevel::Error,
                    &format!("Unknown message type '{kind}' for message {raw}"),
                );
                DispatchOutcome::Rejected
            }
            Inbound::Malformed { kind, reason } => {
                self.sink.log(
                    LogLevel::Error,
                    &format!("Malformed '{kind}' message ({reason}): {raw}"),
                );
                DispatchOutcome::Rejected
            }
        }
    }

    /// Route an already-decoded message.
    pub fn dispatch(&self, message: FrameMessage) -> DispatchOutcome {
        debug!(
            target: "twarchive_frame::dispatch",
            kind = message.kind(),
            "dispatching frame message"
        );
        match message {
            FrameMessage::Resize(report) => {
                DispatchOutcome::Resized(self.resolver.apply_resize(&self.host, &report.selector()))
            }
            FrameMessage::DisplayDataUri { data_uri } => {
                match self.renderer.navigate_and_render(&self.host, &data_uri) {
                    Ok(()) => DispatchOutcome::DisplayedDataUri,
                    Err(err) => {
                        warn!(target: "twarchive_frame::dispatch", error = %err, "data URI display failed");
                        self.sink
                            .log(LogLevel::Error, &format!("Failed to display data URI: {err}"));
                        DispatchOutcome::Failed
                    }
                }
            }
            FrameMessage::ChildLog { level, message } => {
                self.sink.log(LogLevel::parse(&level), &message);
                DispatchOutcome::Logged
            }
        }
    }

    /// Open or close every collapsible embed on the page.
    ///
    /// `state` is `"open"` or `"closed"`; anything else is logged and ignored.
    pub fn set_collapsible_display(&self, state: &str) -> usize {
        let open = match state {
            "open" => true,
            "closed" => false,
            other => {
                self.sink
                    .log(LogLevel::Log, &format!("Unknown state: {other}"));
                return 0;
            }
        };
        self.host
            .set_collapsibles_open(&self.config.collapsible_class, open)
    }
}
