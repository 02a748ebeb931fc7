//! Browser bindings.
//!
//! `TablixView` wraps a [`TablixControl`] for JavaScript hosts. Resize passes
//! are scheduled with `requestAnimationFrame`; the host supplies the frame
//! callback, which should call back into `on_frame`:
//!
//! ```javascript
//! const view = new TablixView(contentJson, configJson, width, height, devicePixelRatio);
//! view.set_frame_callback(() => { view.on_frame(); redraw(view.report()); });
//! view.render();
//! ```

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::config::LayoutConfig;
use crate::content::StaticContent;
use crate::control::TablixControl;
use crate::layout::Canvas;
use crate::resize::{FrameHandle, FrameScheduler};
use crate::types::{Axis, Viewport};

/// [`FrameScheduler`] backed by `window.requestAnimationFrame`.
#[derive(Default)]
pub struct AnimationFrameScheduler {
    callback: Option<Function>,
}

impl AnimationFrameScheduler {
    pub fn set_callback(&mut self, callback: Option<Function>) {
        self.callback = callback;
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.as_ref()?;
        let window = web_sys::window()?;
        let id = window.request_animation_frame(callback).ok()?;
        FrameHandle::try_from(id).ok()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let (Some(window), Ok(id)) = (web_sys::window(), i32::try_from(handle)) else {
            return;
        };
        if let Err(e) = window.cancel_animation_frame(id) {
            log::debug!("cancelAnimationFrame({id}) failed: {e:?}");
        }
    }
}

fn axis_from_name(name: &str) -> Result<Axis, JsValue> {
    Axis::from_name(name).ok_or_else(|| JsValue::from_str(&format!("Unknown axis: {name}")))
}

/// A tablix bound to the browser's frame loop.
#[wasm_bindgen]
pub struct TablixView {
    control: TablixControl<StaticContent, Canvas, AnimationFrameScheduler>,
}

#[wasm_bindgen]
impl TablixView {
    /// Create a view from content JSON and an optional configuration JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(
        content_json: &str,
        config_json: Option<String>,
        width: f64,
        height: f64,
        dpr: f64,
    ) -> Result<TablixView, JsValue> {
        console_error_panic_hook::set_once();
        let content = StaticContent::from_json(content_json).map_err(JsValue::from)?;
        let config = match config_json {
            Some(json) => LayoutConfig::from_json(&json).map_err(JsValue::from)?,
            None => LayoutConfig::default(),
        };
        let viewport = Viewport::new(width, height).with_scale(dpr);
        let control = TablixControl::new(content, &config, viewport, AnimationFrameScheduler::default())
            .map_err(JsValue::from)?;
        Ok(Self { control })
    }

    /// Callback `requestAnimationFrame` invokes for pending resize passes.
    pub fn set_frame_callback(&mut self, callback: Option<Function>) {
        self.control.scheduler_mut().set_callback(callback);
    }

    /// Run a layout session and return the report.
    pub fn render(&mut self) -> Result<JsValue, JsValue> {
        self.control.render();
        self.report()
    }

    pub fn report(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.control.report())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    pub fn set_content(&mut self, content_json: &str) -> Result<(), JsValue> {
        let content = StaticContent::from_json(content_json).map_err(JsValue::from)?;
        self.control.set_content(content);
        Ok(())
    }

    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) -> Result<(), JsValue> {
        self.control
            .set_viewport(Viewport::new(width, height).with_scale(dpr))
            .map_err(JsValue::from)
    }

    /// Scroll `axis` (`"column"` or `"row"`) to `offset` leaves.
    pub fn scroll_to(&mut self, axis: &str, offset: f64) -> Result<f64, JsValue> {
        Ok(self.control.scroll_to(axis_from_name(axis)?, offset))
    }

    pub fn scroll_by(&mut self, axis: &str, delta: f64) -> Result<f64, JsValue> {
        Ok(self.control.scroll_by(axis_from_name(axis)?, delta))
    }

    pub fn on_start_resize(&mut self, column: usize) -> Result<(), JsValue> {
        self.control.on_start_resize(column).map_err(JsValue::from)
    }

    pub fn on_resize(&mut self, delta: f64) -> Result<(), JsValue> {
        self.control.on_resize(delta).map_err(JsValue::from)
    }

    /// Run the pending resize pass. Returns `true` if one ran.
    pub fn on_frame(&mut self) -> bool {
        self.control.on_frame().is_some()
    }

    pub fn on_end_resize(&mut self) -> bool {
        self.control.on_end_resize().is_some()
    }

    pub fn on_reset(&mut self) {
        self.control.on_reset();
    }
}
