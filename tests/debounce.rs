#![cfg(feature = "render")]
use gloo_timers::future::sleep;
use meme_bubbles_wasm::infrastructure::Debouncer;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn burst_fires_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let debouncer = Debouncer::new(30, move || counter.set(counter.get() + 1));

    for _ in 0..5 {
        debouncer.trigger();
        sleep(Duration::from_millis(5)).await;
    }
    assert!(debouncer.is_pending());
    assert_eq!(calls.get(), 0);

    sleep(Duration::from_millis(80)).await;
    assert_eq!(calls.get(), 1);
    assert!(!debouncer.is_pending());
}

#[wasm_bindgen_test]
async fn cancel_drops_pending_call() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let debouncer = Debouncer::new(20, move || counter.set(counter.get() + 1));

    debouncer.trigger();
    debouncer.cancel();
    sleep(Duration::from_millis(60)).await;
    assert_eq!(calls.get(), 0);
}
