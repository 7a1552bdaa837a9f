#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and the `web-sys` implementation of the
//! `twarchive-frame` host traits. Only compiled on `wasm32` targets.

use std::rc::Rc;

use js_sys::{Array, JSON, Object};
use tracing::debug;
use twarchive_frame::{
    AddressBar, ChildDocument, DataUriEscapeAgent, DocumentSurface, EscapeRoute, ExplanationPanel,
    FrameConfig, FrameError, FrameHost, FrameMessage, HostMessageDispatcher, LogLevel, LogSink,
    MarkerDetector, ParentChannel, ResizeObservationAgent, ResizeReport, RootObserver,
    SandboxedFrame, SizeReporter, TopLevelDataUriRenderer,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlDetailsElement, HtmlElement, HtmlIFrameElement, MessageEvent,
    ResizeObserver, Window,
};

use crate::dom;

fn js_detail(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| JSON::stringify(err).ok().map(String::from))
        .unwrap_or_else(|| format!("{err:?}"))
}

fn platform(operation: &'static str) -> impl FnOnce(JsValue) -> FrameError {
    move |err| FrameError::platform(operation, js_detail(&err))
}

fn to_js(err: FrameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

/// Show a data URI smuggled in the address, once per document load.
#[wasm_bindgen(start)]
pub fn start() {
    install_panic_hook();
    let result = WebPage::current().and_then(|page| {
        let href = page.href()?;
        let mut detector = MarkerDetector::default();
        TopLevelDataUriRenderer::default().display_marked_address(&mut detector, &page, &href)
    });
    if let Err(err) = result {
        ConsoleLogSink.log(
            LogLevel::Error,
            &format!("could not display data URI from address: {err}"),
        );
    }
}

/// The current window and document.
#[derive(Debug, Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn current() -> twarchive_frame::Result<Self> {
        let window = web_sys::window().ok_or(FrameError::missing("window"))?;
        let document = window.document().ok_or(FrameError::missing("document"))?;
        Ok(Self { window, document })
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    fn body(&self) -> twarchive_frame::Result<HtmlElement> {
        self.document.body().ok_or(FrameError::missing("body"))
    }
}

impl ParentChannel for WebPage {
    fn is_top_level(&self) -> bool {
        match self.window.top() {
            Ok(Some(top)) => Object::is(top.as_ref(), self.window.as_ref()),
            Ok(None) => true,
            Err(_) => false,
        }
    }

    fn post_to_parent(&self, message: &FrameMessage) -> twarchive_frame::Result<()> {
        let parent = self
            .window
            .parent()
            .map_err(platform("window.parent"))?
            .ok_or(FrameError::missing("parent window"))?;
        let value = JSON::parse(&serde_json::to_string(message)?).map_err(platform("JSON.parse"))?;
        // Any origin: the embed does not know where it is hosted.
        parent
            .post_message(&value, "*")
            .map_err(platform("postMessage"))
    }
}

/// A `ResizeObserver` on the document root that posts resize reports.
pub struct WebRootObserver {
    observer: ResizeObserver,
    root: Element,
    _callback: Closure<dyn FnMut(Array, ResizeObserver)>,
}

impl RootObserver for WebRootObserver {
    fn observe(&self) -> twarchive_frame::Result<()> {
        self.observer.observe(&self.root);
        Ok(())
    }

    fn unobserve(&self) -> twarchive_frame::Result<()> {
        self.observer.unobserve(&self.root);
        Ok(())
    }
}

impl Drop for WebRootObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl ChildDocument for WebPage {
    type Observer = WebRootObserver;

    fn create_observer(&self, reporter: SizeReporter) -> twarchive_frame::Result<WebRootObserver> {
        let root = self
            .document
            .document_element()
            .ok_or(FrameError::missing("document element"))?;
        let page = self.clone();
        let callback = Closure::<dyn FnMut(Array, ResizeObserver)>::new(
            move |_entries: Array, _observer: ResizeObserver| {
                if let Err(err) = reporter.on_size_observed(&page) {
                    ConsoleLogSink.log(
                        LogLevel::Warn,
                        &format!("frame {}: resize report failed: {err}", reporter.identity()),
                    );
                }
            },
        );
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())
            .map_err(platform("new ResizeObserver"))?;
        Ok(WebRootObserver {
            observer,
            root,
            _callback: callback,
        })
    }

    fn viewport_size(&self) -> (f64, f64) {
        let dim = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        (dim(self.window.inner_width()), dim(self.window.inner_height()))
    }
}

impl FrameHost for WebPage {
    type Frame = HtmlIFrameElement;

    fn frames_with_class(&self, class: &str) -> Vec<HtmlIFrameElement> {
        let collection = self.document.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|idx| collection.item(idx))
            .filter_map(|el| el.dyn_into::<HtmlIFrameElement>().ok())
            .collect()
    }

    fn content_height(&self, frame: &HtmlIFrameElement) -> Option<f64> {
        let body = frame.content_document()?.body()?;
        Some(body.get_bounding_client_rect().height())
    }

    fn set_frame_height(&self, frame: &HtmlIFrameElement, height: f64) {
        frame.set_height(&dom::frame_height_attr(height));
    }

    fn frame_attribute(&self, frame: &HtmlIFrameElement, name: &str) -> Option<String> {
        frame.get_attribute(name)
    }

    fn set_collapsibles_open(&self, class: &str, open: bool) -> usize {
        let collection = self.document.get_elements_by_class_name(class);
        let mut changed = 0;
        for idx in 0..collection.length() {
            let Some(details) = collection
                .item(idx)
                .and_then(|el| el.dyn_into::<HtmlDetailsElement>().ok())
            else {
                continue;
            };
            details.set_open(open);
            changed += 1;
        }
        changed
    }
}

impl AddressBar for WebPage {
    fn href(&self) -> twarchive_frame::Result<String> {
        self.window
            .location()
            .href()
            .map_err(platform("location.href"))
    }

    fn assign(&self, href: &str) -> twarchive_frame::Result<()> {
        self.window
            .location()
            .set_href(href)
            .map_err(platform("location.href="))
    }
}

impl DocumentSurface for WebPage {
    fn reset_to_blank(&self, markup: &str, body_style: &str) -> twarchive_frame::Result<()> {
        let root = self
            .document
            .document_element()
            .ok_or(FrameError::missing("document element"))?;
        root.set_inner_html(markup);
        self.body()?
            .set_attribute("style", body_style)
            .map_err(platform("body.style"))
    }

    fn append_frame(&self, frame: &SandboxedFrame) -> twarchive_frame::Result<()> {
        let element = self
            .document
            .create_element("iframe")
            .map_err(platform("createElement"))?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| FrameError::missing("iframe element"))?;
        element
            .set_attribute("sandbox", frame.sandbox)
            .map_err(platform("iframe.sandbox"))?;
        element
            .set_attribute("style", frame.style)
            .map_err(platform("iframe.style"))?;
        element.set_src(&frame.src);
        self.body()?
            .append_child(&element)
            .map_err(platform("appendChild"))?;
        Ok(())
    }
}

struct WebPanel(HtmlElement);

impl ExplanationPanel for WebPanel {
    fn is_shown(&self) -> bool {
        let display = self
            .0
            .style()
            .get_property_value("display")
            .unwrap_or_default();
        !dom::display_is_hidden(&display)
    }

    fn set_shown(&self, shown: bool) {
        let _ = self
            .0
            .style()
            .set_property("display", dom::panel_display(shown));
    }
}

/// Writes sink records to the browser console.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogSink;

impl LogSink for ConsoleLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        let value = JsValue::from_str(message);
        match level {
            LogLevel::Debug => web_sys::console::debug_1(&value),
            LogLevel::Log => web_sys::console::log_1(&value),
            LogLevel::Info => web_sys::console::info_1(&value),
            LogLevel::Warn => web_sys::console::warn_1(&value),
            LogLevel::Error => web_sys::console::error_1(&value),
        }
    }
}

/// Runs inside an embedded post document.
#[wasm_bindgen]
pub struct ChildFrame {
    agent: ResizeObservationAgent<WebPage>,
    escape: DataUriEscapeAgent,
    explanation_class: String,
}

#[wasm_bindgen]
impl ChildFrame {
    #[wasm_bindgen(constructor)]
    pub fn new(
        content_id: &str,
        instance_ordinal: Option<String>,
        config_json: Option<String>,
    ) -> Result<ChildFrame, JsValue> {
        install_panic_hook();
        let config = FrameConfig::from_optional_json(config_json.as_deref()).map_err(to_js)?;
        let page = WebPage::current().map_err(to_js)?;
        let identity = dom::frame_identity(content_id, instance_ordinal.as_deref());
        debug!(target: "twarchive_web::child", frame = %identity, "child frame created");
        Ok(Self {
            agent: ResizeObservationAgent::new(identity, page),
            escape: DataUriEscapeAgent::default(),
            explanation_class: config.explanation_class,
        })
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.agent.start().map_err(to_js)
    }

    pub fn stop(&mut self) -> Result<(), JsValue> {
        self.agent.stop().map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn observing(&self) -> bool {
        self.agent.state() == twarchive_frame::ObservationState::Observing
    }

    #[wasm_bindgen(js_name = reportSize)]
    pub fn report_size(&self) -> Result<(), JsValue> {
        self.agent.report_size().map_err(to_js)
    }

    /// Show or hide the explanation panel next to `button`.
    #[wasm_bindgen(js_name = toggleExplanation)]
    pub fn toggle_explanation(&mut self, button: &HtmlElement) -> Result<(), JsValue> {
        let container = button
            .parent_element()
            .ok_or(FrameError::missing("explanation button parent"))
            .map_err(to_js)?;
        let panel = container
            .get_elements_by_class_name(&self.explanation_class)
            .item(0)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or(FrameError::missing("explanation panel"))
            .map_err(to_js)?;
        self.agent
            .toggle_explanation(&WebPanel(panel))
            .map_err(to_js)
    }

    /// Returns `true` when the request was forwarded to the parent.
    #[wasm_bindgen(js_name = handleDataUri)]
    pub fn handle_data_uri(&self, data_uri: &str) -> Result<bool, JsValue> {
        let route = self
            .escape
            .handle(self.agent.document(), data_uri)
            .map_err(to_js)?;
        Ok(route == EscapeRoute::Forwarded)
    }

    /// Log through the host page's console.
    pub fn log(&self, level: &str, message: &str) -> Result<(), JsValue> {
        self.agent
            .log_to_parent(LogLevel::parse(level), message)
            .map_err(to_js)
    }
}

/// Runs once in the top-level page.
#[wasm_bindgen]
pub struct HostFrame {
    dispatcher: Rc<HostMessageDispatcher<WebPage, ConsoleLogSink>>,
    window: Window,
    listener: Option<Closure<dyn FnMut(MessageEvent)>>,
}

/// Structured-clone message data as JSON, or `None` for values JSON cannot
/// carry (functions, cyclic objects, `undefined`). Such values are never ours.
#[must_use]
pub fn message_value(data: &JsValue) -> Option<serde_json::Value> {
    let text = JSON::stringify(data).ok()?.as_string()?;
    serde_json::from_str(&text).ok()
}

#[wasm_bindgen]
impl HostFrame {
    /// Start listening for embed messages on this window.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<HostFrame, JsValue> {
        install_panic_hook();
        let config = FrameConfig::from_optional_json(config_json.as_deref()).map_err(to_js)?;
        let page = WebPage::current().map_err(to_js)?;
        let window = page.window.clone();
        let dispatcher = Rc::new(HostMessageDispatcher::new(page, ConsoleLogSink, config));

        let receiver = Rc::clone(&dispatcher);
        let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(raw) = message_value(&event.data()) else {
                return;
            };
            let outcome = receiver.on_message(&raw);
            debug!(target: "twarchive_web::host", ?outcome, "handled message");
        });
        window
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
            .map_err(|err| to_js(platform("addEventListener")(err)))?;

        Ok(Self {
            dispatcher,
            window,
            listener: Some(listener),
        })
    }

    /// Re-measure frames of one instance, or all embeds when `None`.
    /// Returns the number of frames updated.
    #[wasm_bindgen(js_name = resizeFrames)]
    pub fn resize_frames(&self, instance_ordinal: Option<String>) -> u32 {
        let report = ResizeReport {
            content_id: None,
            instance_ordinal,
            width: 0.0,
            height: 0.0,
        };
        match self.dispatcher.dispatch(FrameMessage::Resize(report)) {
            twarchive_frame::DispatchOutcome::Resized(summary) => {
                u32::try_from(summary.updated).unwrap_or(u32::MAX)
            }
            _ => 0,
        }
    }

    /// `"open"` or `"closed"`; returns how many collapsibles changed.
    #[wasm_bindgen(js_name = setCollapsibleDisplay)]
    pub fn set_collapsible_display(&self, state: &str) -> u32 {
        u32::try_from(self.dispatcher.set_collapsible_display(state)).unwrap_or(u32::MAX)
    }

    /// Stop listening. Also happens on drop.
    pub fn dispose(&mut self) {
        if let Some(listener) = self.listener.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("message", listener.as_ref().unchecked_ref());
        }
    }
}

impl Drop for HostFrame {
    fn drop(&mut self) {
        self.dispose();
    }
}
