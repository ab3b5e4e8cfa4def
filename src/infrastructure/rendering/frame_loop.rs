use crate::domain::errors::DomError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` loop calling `on_frame` with the frame timestamp
/// until stopped.
pub struct FrameLoop {
    running: Rc<Cell<bool>>,
    request_id: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::Unavailable("window"))?;
        let running = Rc::new(Cell::new(true));
        let request_id = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let frame = {
            let running = Rc::clone(&running);
            let request_id = Rc::clone(&request_id);
            let callback = Rc::clone(&callback);
            let window = window.clone();
            Closure::wrap(Box::new(move |timestamp: f64| {
                if !running.get() {
                    return;
                }
                on_frame(timestamp);
                if !running.get() {
                    return;
                }
                if let Some(next) = callback.borrow().as_ref() {
                    request_id.set(window.request_animation_frame(next.as_ref().unchecked_ref()).ok());
                }
            }) as Box<dyn FnMut(f64)>)
        };

        let id = window
            .request_animation_frame(frame.as_ref().unchecked_ref())
            .map_err(|e| DomError::OperationFailed(format!("requestAnimationFrame: {e:?}")))?;
        request_id.set(Some(id));
        *callback.borrow_mut() = Some(frame);

        Ok(Self { running, request_id, callback })
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&self) {
        self.running.set(false);
        if let (Some(id), Some(window)) = (self.request_id.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference cycle through `callback`.
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
