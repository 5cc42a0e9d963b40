//! Browser mounting
//!
//! Creates the overlay canvas, wires DOM listeners into the simulation's
//! input adapter and drives frames from `requestAnimationFrame`. Listener
//! closures only translate events; all state changes happen inside the frame.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent, Window};

use crate::config::SimConfig;
use crate::consts::MAX_PIXEL_RATIO;
use crate::driver::{FrameRequest, Simulation};
use crate::input::{HostEvent, HostEventKind, InputEvent, Modifiers};
use crate::renderer::WgpuBackend;
use crate::sim::{Camera, Viewport};

const CANVAS_STYLE: &str =
    "position:fixed;top:0;left:0;width:100%;height:100%;z-index:1050;touch-action:none";

/// A registered DOM listener, kept so it can be removed again
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct Mounted {
    sim: RefCell<Simulation<WgpuBackend>>,
    canvas: HtmlCanvasElement,
    pixel_ratio: f32,
    listeners: RefCell<Vec<Listener>>,
    frame_id: Cell<Option<i32>>,
    frame_callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Mounted {
    /// Ordered teardown: frames, listeners, simulation/backend, canvas
    fn teardown(&self) {
        if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        for listener in self.listeners.borrow_mut().drain(..) {
            let _ = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.callback.as_ref().unchecked_ref());
        }
        if let Ok(mut sim) = self.sim.try_borrow_mut() {
            sim.unmount();
        }
        self.frame_callback.borrow_mut().take();
        self.canvas.remove();
    }

    /// Match the canvas backing store to the (debounced) viewport
    fn sync_canvas_size(&self, viewport: &Viewport) {
        let width = (viewport.width * self.pixel_ratio).round().max(1.0) as u32;
        let height = (viewport.height * self.pixel_ratio).round().max(1.0) as u32;
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// JS-facing handle to a mounted bug
#[wasm_bindgen]
pub struct BugHandle {
    mounted: Rc<Mounted>,
}

#[wasm_bindgen]
impl BugHandle {
    /// Remove the bug from the page; later calls do nothing
    pub fn unmount(&self) {
        self.mounted.teardown();
    }

    pub fn set_active(&self, active: bool) {
        if let Ok(mut sim) = self.mounted.sim.try_borrow_mut() {
            sim.set_active(active);
        }
    }

    pub fn is_debug_visible(&self) -> bool {
        self.mounted
            .sim
            .try_borrow()
            .map(|sim| sim.is_debug_visible())
            .unwrap_or(false)
    }

    /// Forward a scroll offset; the window's own scrolling is tracked
    /// automatically, this is for hosts that scroll an inner container
    pub fn set_scroll_position(&self, value: f32) {
        if let Ok(mut sim) = self.mounted.sim.try_borrow_mut() {
            sim.push_event(InputEvent::ScrollPosition(value));
        }
    }

    /// Make the bug bolt away from the last pointer position
    pub fn panic(&self) -> bool {
        self.mounted
            .sim
            .try_borrow_mut()
            .map(|mut sim| sim.panic(None))
            .unwrap_or(false)
    }

    /// Current diagnostic snapshot as JSON
    pub fn debug_json(&self) -> Result<String, JsValue> {
        let sim = self.mounted.sim.try_borrow().map_err(js_err)?;
        sim.debug_snapshot().to_json().map_err(js_err)
    }

    /// Overlay text, one line per `\n`; empty when the overlay is off
    pub fn debug_text(&self) -> String {
        self.mounted
            .sim
            .try_borrow()
            .map(|sim| sim.debug_snapshot().overlay_lines().join("\n"))
            .unwrap_or_default()
    }
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // Already installed on a second mount
    let _ = console_log::init_with_level(log::Level::Info);
}

fn viewport_size(window: &Window) -> (f32, f32) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// Mount a bug overlay inside the element with id `container_id`
///
/// `config_json` may override any subset of the simulation settings.
#[wasm_bindgen]
pub async fn mount_bug(container_id: String, config_json: Option<String>) -> Result<BugHandle, JsValue> {
    init_logging();

    let config = match config_json.as_deref() {
        Some(json) => SimConfig::from_json(json).map_err(js_err)?,
        None => SimConfig::default(),
    };

    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let document = window.document().ok_or_else(|| js_err("no document"))?;
    let container = document
        .get_element_by_id(&container_id)
        .ok_or_else(|| js_err(format!("no element with id `{container_id}`")))?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_attribute("style", CANVAS_STYLE)?;
    container.append_child(&canvas)?;

    match start(&window, canvas.clone(), config).await {
        Ok(mounted) => Ok(BugHandle { mounted }),
        Err(e) => {
            canvas.remove();
            Err(e)
        }
    }
}

async fn start(window: &Window, canvas: HtmlCanvasElement, config: SimConfig) -> Result<Rc<Mounted>, JsValue> {
    let (width, height) = viewport_size(window);
    let pixel_ratio = window.device_pixel_ratio().min(MAX_PIXEL_RATIO) as f32;
    canvas.set_width((width * pixel_ratio).round().max(1.0) as u32);
    canvas.set_height((height * pixel_ratio).round().max(1.0) as u32);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
        ..Default::default()
    });
    let surface = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
        .map_err(js_err)?;
    let backend = WgpuBackend::new(&instance, surface, Camera::new(width, height), pixel_ratio)
        .await
        .map_err(js_err)?;

    let seed = js_sys::Date::now() as u64;
    let mut sim = Simulation::mount(backend, Viewport::new(width, height), config, seed).map_err(js_err)?;
    // Client coordinates are CSS pixels and the canvas is pinned to the top-left
    let rect = canvas.get_bounding_client_rect();
    sim.set_pointer_mapping(1.0, Vec2::new(rect.left() as f32, rect.top() as f32));

    let mounted = Rc::new(Mounted {
        sim: RefCell::new(sim),
        canvas: canvas.clone(),
        pixel_ratio,
        listeners: RefCell::new(Vec::new()),
        frame_id: Cell::new(None),
        frame_callback: RefCell::new(None),
    });

    let canvas_target: &EventTarget = canvas.as_ref();
    let window_target: &EventTarget = window.as_ref();
    listen(&mounted, canvas_target, "click", true, |e| {
        pointer(e, HostEventKind::Click)
    })?;
    listen(&mounted, canvas_target, "mousemove", true, |e| {
        pointer(e, HostEventKind::PointerMove)
    })?;
    // Non-passive so the page does not also scroll/zoom
    listen(&mounted, canvas_target, "touchstart", false, |e| {
        e.prevent_default();
        let touch = e.dyn_ref::<TouchEvent>()?.touches().get(0)?;
        Some(HostEvent::at(
            HostEventKind::TouchStart,
            touch.client_x() as f32,
            touch.client_y() as f32,
        ))
    })?;
    listen(&mounted, window_target, "keydown", true, |e| {
        let key = e.dyn_ref::<KeyboardEvent>()?;
        let modifiers = Modifiers {
            ctrl: key.ctrl_key(),
            shift: key.shift_key(),
            alt: key.alt_key(),
            meta: key.meta_key(),
        };
        Some(HostEvent::key(&key.key(), modifiers))
    })?;
    listen(&mounted, window_target, "resize", true, |_| {
        let window = web_sys::window()?;
        let (width, height) = viewport_size(&window);
        Some(HostEvent::new(HostEventKind::Resize { width, height }))
    })?;
    listen(&mounted, window_target, "scroll", true, |_| {
        let position = web_sys::window()?.scroll_y().ok()? as f32;
        Some(HostEvent::new(HostEventKind::Scroll { position }))
    })?;
    if let Ok(position) = window.scroll_y() {
        mounted
            .sim
            .borrow_mut()
            .push_event(InputEvent::ScrollPosition(position as f32));
    }

    start_frames(&mounted)?;
    log::info!("Bug overlay running ({}x{} @ {}x)", width, height, pixel_ratio);
    Ok(mounted)
}

fn pointer(event: &Event, kind: HostEventKind) -> Option<HostEvent> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(HostEvent::at(kind, mouse.client_x() as f32, mouse.client_y() as f32))
}

/// Register a listener that translates DOM events into host events
fn listen(
    mounted: &Rc<Mounted>,
    target: &EventTarget,
    kind: &'static str,
    passive: bool,
    translate: impl Fn(&Event) -> Option<HostEvent> + 'static,
) -> Result<(), JsValue> {
    let weak: Weak<Mounted> = Rc::downgrade(mounted);
    let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(mounted) = weak.upgrade() else {
            return;
        };
        let Some(host_event) = translate(&event) else {
            return;
        };
        if let Ok(mut sim) = mounted.sim.try_borrow_mut() {
            sim.handle_host_event(&host_event);
        }
    });

    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    mounted.listeners.borrow_mut().push(Listener {
        target: target.clone(),
        kind,
        callback,
    });
    Ok(())
}

fn start_frames(mounted: &Rc<Mounted>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(mounted);
    let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        let Some(mounted) = weak.upgrade() else {
            return;
        };
        mounted.frame_id.set(None);

        let request = match mounted.sim.try_borrow_mut() {
            Ok(mut sim) => {
                let request = sim.frame(timestamp);
                mounted.sync_canvas_size(&sim.state().viewport);
                request
            }
            Err(_) => FrameRequest::Continue,
        };

        if request == FrameRequest::Continue {
            if let Err(e) = request_frame(&mounted) {
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
    });
    *mounted.frame_callback.borrow_mut() = Some(callback);
    request_frame(mounted)
}

fn request_frame(mounted: &Mounted) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let callback = mounted.frame_callback.borrow();
    if let Some(callback) = callback.as_ref() {
        let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        mounted.frame_id.set(Some(id));
    }
    Ok(())
}
