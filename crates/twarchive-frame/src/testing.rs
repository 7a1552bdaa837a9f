//! In-memory documents for unit tests.

use std::cell::{Cell, RefCell};

use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::host::{
    AddressBar, ChildDocument, DocumentSurface, ExplanationPanel, FrameHost, LogSink,
    ParentChannel, RootObserver,
};
use crate::message::{FrameMessage, LogLevel};
use crate::observer::SizeReporter;
use crate::render::SandboxedFrame;

#[derive(Debug, Default)]
struct ObserverCounters {
    created: Cell<usize>,
    observe: Cell<usize>,
    unobserve: Cell<usize>,
}

/// An embedded document whose parent posts are recorded.
#[derive(Debug)]
pub struct FakeChild {
    viewport: Cell<(f64, f64)>,
    top_level: bool,
    posted: RefCell<Vec<FrameMessage>>,
    counters: std::rc::Rc<ObserverCounters>,
    reporter: RefCell<Option<SizeReporter>>,
}

impl FakeChild {
    pub fn embedded(width: f64, height: f64) -> Self {
        Self {
            viewport: Cell::new((width, height)),
            top_level: false,
            posted: RefCell::new(Vec::new()),
            counters: std::rc::Rc::default(),
            reporter: RefCell::new(None),
        }
    }

    /// Deliver one size change the way the platform observer callback does.
    pub fn fire_observer(&self) -> Result<()> {
        let reporter = self.reporter.borrow().clone();
        match reporter {
            Some(reporter) => reporter.on_size_observed(self),
            None => Ok(()),
        }
    }

    pub fn posted(&self) -> Vec<FrameMessage> {
        self.posted.borrow().clone()
    }

    pub fn observers_created(&self) -> usize {
        self.counters.created.get()
    }

    pub fn observe_calls(&self) -> usize {
        self.counters.observe.get()
    }

    pub fn unobserve_calls(&self) -> usize {
        self.counters.unobserve.get()
    }
}

impl ParentChannel for FakeChild {
    fn is_top_level(&self) -> bool {
        self.top_level
    }

    fn post_to_parent(&self, message: &FrameMessage) -> Result<()> {
        self.posted.borrow_mut().push(message.clone());
        Ok(())
    }
}

pub struct FakeObserver {
    counters: std::rc::Rc<ObserverCounters>,
}

impl RootObserver for FakeObserver {
    fn observe(&self) -> Result<()> {
        self.counters.observe.set(self.counters.observe.get() + 1);
        Ok(())
    }

    fn unobserve(&self) -> Result<()> {
        self.counters.unobserve.set(self.counters.unobserve.get() + 1);
        Ok(())
    }
}

impl ChildDocument for FakeChild {
    type Observer = FakeObserver;

    fn create_observer(&self, reporter: SizeReporter) -> Result<FakeObserver> {
        self.counters.created.set(self.counters.created.get() + 1);
        *self.reporter.borrow_mut() = Some(reporter);
        Ok(FakeObserver {
            counters: std::rc::Rc::clone(&self.counters),
        })
    }

    fn viewport_size(&self) -> (f64, f64) {
        self.viewport.get()
    }
}

pub struct FakePanel {
    shown: Cell<bool>,
}

impl FakePanel {
    pub fn hidden() -> Self {
        Self {
            shown: Cell::new(false),
        }
    }
}

impl ExplanationPanel for FakePanel {
    fn is_shown(&self) -> bool {
        self.shown.get()
    }

    fn set_shown(&self, shown: bool) {
        self.shown.set(shown);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    Assign(String),
    Reset { markup: String, body_style: String },
    Append(SandboxedFrame),
}

/// Address bar plus replaceable document.
#[derive(Debug, Default)]
pub struct FakePage {
    href: RefCell<String>,
    top_level: bool,
    failing: bool,
    ops: RefCell<Vec<SurfaceOp>>,
    frames: RefCell<Vec<SandboxedFrame>>,
    posted: RefCell<Vec<FrameMessage>>,
}

impl FakePage {
    pub fn at(href: &str) -> Self {
        Self {
            href: RefCell::new(href.to_string()),
            top_level: true,
            ..Self::default()
        }
    }

    pub fn embedded_at(href: &str) -> Self {
        Self {
            top_level: false,
            ..Self::at(href)
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::at("https://example.org/")
        }
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.borrow().clone()
    }

    pub fn frames(&self) -> Vec<SandboxedFrame> {
        self.frames.borrow().clone()
    }

    pub fn posted(&self) -> Vec<FrameMessage> {
        self.posted.borrow().clone()
    }
}

impl AddressBar for FakePage {
    fn href(&self) -> Result<String> {
        Ok(self.href.borrow().clone())
    }

    fn assign(&self, href: &str) -> Result<()> {
        if self.failing {
            return Err(FrameError::platform("location.assign", "blocked"));
        }
        *self.href.borrow_mut() = href.to_string();
        self.ops.borrow_mut().push(SurfaceOp::Assign(href.to_string()));
        Ok(())
    }
}

impl DocumentSurface for FakePage {
    fn reset_to_blank(&self, markup: &str, body_style: &str) -> Result<()> {
        if self.failing {
            return Err(FrameError::missing("document element"));
        }
        self.frames.borrow_mut().clear();
        self.ops.borrow_mut().push(SurfaceOp::Reset {
            markup: markup.to_string(),
            body_style: body_style.to_string(),
        });
        Ok(())
    }

    fn append_frame(&self, frame: &SandboxedFrame) -> Result<()> {
        self.frames.borrow_mut().push(frame.clone());
        self.ops.borrow_mut().push(SurfaceOp::Append(frame.clone()));
        Ok(())
    }
}

impl ParentChannel for FakePage {
    fn is_top_level(&self) -> bool {
        self.top_level
    }

    fn post_to_parent(&self, message: &FrameMessage) -> Result<()> {
        self.posted.borrow_mut().push(message.clone());
        Ok(())
    }
}

/// One `<iframe>` in the host document.
#[derive(Debug)]
pub struct FakeFrame {
    classes: Vec<String>,
    content_id: String,
    instance: String,
    content_height: Option<f64>,
    height: Cell<Option<f64>>,
}

impl FakeFrame {
    /// Classes follow the default [`FrameConfig`] naming.
    pub fn embed(content_id: &str, instance: &str, content_height: Option<f64>) -> Self {
        let config = FrameConfig::default();
        Self {
            classes: vec![
                config.frame_class.clone(),
                format!("{}{content_id}", config.content_class_prefix),
                format!("{}{instance}", config.instance_class_prefix),
            ],
            content_id: content_id.to_string(),
            instance: instance.to_string(),
            content_height,
            height: Cell::new(None),
        }
    }
}

#[derive(Debug)]
pub struct FakeHost {
    frames: Vec<FakeFrame>,
    page: FakePage,
    collapsibles_open: Cell<Option<bool>>,
}

impl FakeHost {
    pub fn new(frames: Vec<FakeFrame>) -> Self {
        Self {
            frames,
            page: FakePage::at("https://example.org/"),
            collapsibles_open: Cell::new(None),
        }
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.page = FakePage::at(href);
        self
    }

    pub fn with_failing_page(mut self) -> Self {
        self.page = FakePage::failing();
        self
    }

    pub fn page(&self) -> &FakePage {
        &self.page
    }

    pub fn frame_height(&self, idx: usize) -> Option<f64> {
        self.frames[idx].height.get()
    }

    pub fn collapsibles_open(&self) -> Option<bool> {
        self.collapsibles_open.get()
    }
}

impl FrameHost for FakeHost {
    type Frame = usize;

    fn frames_with_class(&self, class: &str) -> Vec<usize> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| frame.classes.iter().any(|c| c == class))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn content_height(&self, frame: &usize) -> Option<f64> {
        self.frames[*frame].content_height
    }

    fn set_frame_height(&self, frame: &usize, height: f64) {
        self.frames[*frame].height.set(Some(height));
    }

    fn frame_attribute(&self, frame: &usize, name: &str) -> Option<String> {
        let config = FrameConfig::default();
        let frame = &self.frames[*frame];
        if name == config.content_id_attribute {
            Some(frame.content_id.clone())
        } else if name == config.instance_attribute {
            Some(frame.instance.clone())
        } else {
            None
        }
    }

    fn set_collapsibles_open(&self, _class: &str, open: bool) -> usize {
        self.collapsibles_open.set(Some(open));
        self.frames.len()
    }
}

impl AddressBar for FakeHost {
    fn href(&self) -> Result<String> {
        self.page.href()
    }

    fn assign(&self, href: &str) -> Result<()> {
        self.page.assign(href)
    }
}

impl DocumentSurface for FakeHost {
    fn reset_to_blank(&self, markup: &str, body_style: &str) -> Result<()> {
        self.page.reset_to_blank(markup, body_style)
    }

    fn append_frame(&self, frame: &SandboxedFrame) -> Result<()> {
        self.page.append_frame(frame)
    }
}

/// Captures every sink record.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: RefCell<Vec<(LogLevel, String)>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.borrow().clone()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, level: LogLevel, message: &str) {
        self.records.borrow_mut().push((level, message.to_string()));
    }
}
