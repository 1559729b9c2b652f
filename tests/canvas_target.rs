#![cfg(target_arch = "wasm32")]

use trading_chart_wasm::domain::chart::paint::PaintTarget;
use trading_chart_wasm::domain::chart::value_objects::Color;
use trading_chart_wasm::domain::errors::AppError;
use trading_chart_wasm::infrastructure::rendering::CanvasTarget;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> HtmlCanvasElement {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.create_element("canvas").ok())
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .expect("browser canvas")
}

#[wasm_bindgen_test]
fn backing_store_is_sized_in_device_pixels() {
    let canvas = canvas();
    let mut target = CanvasTarget::for_canvas(&canvas, 300, 150, 2.0)
        .unwrap()
        .with_background(Color::from_hex(0x131722));

    assert_eq!((canvas.width(), canvas.height()), (600, 300));
    assert_eq!(canvas.style().get_property_value("width").unwrap(), "300px");
    assert_eq!(target.bitmap_size(), (600.0, 300.0));

    target.clear();
    target.set_fill_color(Color::from_hex(0x2196F3));
    target.fill_rect(0.0, 0.0, 10.0, 10.0);
    target.set_line_dash(&[4.0, 4.0]);
    target.stroke_segment(0.0, 0.0, 50.0, 50.0);
    assert_eq!(target.context().get_line_dash().length(), 2);
}

#[wasm_bindgen_test]
fn zero_sized_canvas_is_rejected() {
    assert!(matches!(CanvasTarget::for_canvas(&canvas(), 0, 150, 1.0), Err(AppError::RenderingError(_))));
}
