use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::*;
use strum::IntoEnumIterator;

use crate::application::chart_controller::indicator_lines;
use crate::application::stores::{DrawingStore, IndicatorStore, TradingStore};
use crate::application::{ChartController, DrawingSync};
use crate::config::AppConfig;
use crate::domain::chart::primitives::Primitive;
use crate::domain::chart::{ChartHost, ChartType, Color, CoordinateSource, VisibleRange};
use crate::domain::drawing::DrawingTool;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Candle, IndicatorConfig, IndicatorKind, Symbol, TimeInterval};
use crate::infrastructure::http::{ChartDataClient, DrawingApiClient};
use crate::infrastructure::rendering::CanvasTarget;
use crate::{log_error, log_info};

type AppDrawingSync = DrawingSync<DrawingApiClient>;

const BACKGROUND: u32 = 0x131722;
const LOWER_PANEL_HEIGHT: u32 = 160;
/// Pointer travel (media px) after which a press counts as a drag, not a click.
const DRAG_THRESHOLD: f64 = 3.0;

fn device_pixel_ratio() -> f64 {
    web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

/// Runs `f` on the controller and repaints, unless the controller is missing or
/// already borrowed by the handler whose store write triggered the caller.
fn update_chart(
    controller: &RefCell<Option<ChartController>>,
    repaint: &dyn Fn(),
    f: impl FnOnce(&mut ChartController),
) {
    match controller.try_borrow_mut() {
        Ok(mut slot) => match slot.as_mut() {
            Some(ctrl) => f(ctrl),
            None => return,
        },
        Err(_) => return,
    }
    repaint();
}

fn paint_host(host: &ChartHost, canvas: &web_sys::HtmlCanvasElement) {
    let viewport = host.viewport();
    match CanvasTarget::for_canvas(canvas, viewport.width, viewport.height, host.pixel_ratio()) {
        Ok(target) => host.paint(&mut target.with_background(Color::from_hex(BACKGROUND))),
        Err(err) => {
            log_error!(LogComponent::Presentation("ChartView"), "paint skipped: {}", err);
        }
    }
}

/// Root component: creates the stores and wires loading to the selection.
#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let drawing_store = DrawingStore::new();
    let indicator_store = IndicatorStore::new();
    let trading_store = TradingStore::new(config.symbol(), config.default_interval);
    let candles = create_rw_signal(Vec::<Candle>::new());
    let (status, set_status) = create_signal(String::from("Ready"));
    let (range, set_range) = create_signal(None::<VisibleRange>);

    let sync = Rc::new(DrawingSync::new(
        DrawingApiClient::new(config.api_base_url.clone()),
        drawing_store,
        trading_store.scope_for(&config.user_id),
    ));

    // Drawings follow the selected symbol and timeframe.
    {
        let sync = Rc::clone(&sync);
        let user_id = config.user_id.clone();
        create_effect(move |_| {
            let scope = trading_store.scope_for(&user_id);
            let sync = Rc::clone(&sync);
            spawn_local(async move {
                let result = sync.load(scope.clone()).await;
                if sync.scope() != scope {
                    return;
                }
                match result {
                    Ok(count) => set_status.set(format!("{count} drawings loaded")),
                    Err(err) => set_status.set(err.to_string()),
                }
            });
        });
    }

    // So do the candles.
    {
        let client = ChartDataClient::new(config.api_base_url.clone());
        let latest_fetch = Rc::new(Cell::new(0u64));
        create_effect(move |_| {
            let interval = trading_store.timeframe();
            let fetch = latest_fetch.get() + 1;
            latest_fetch.set(fetch);
            let Some(symbol) = trading_store.symbol() else {
                candles.set(Vec::new());
                return;
            };
            let (client, latest_fetch) = (client.clone(), Rc::clone(&latest_fetch));
            spawn_local(async move {
                let result = client.fetch_candles(&symbol, interval).await;
                if latest_fetch.get() != fetch {
                    return;
                }
                match result {
                    Ok(data) => candles.set(data),
                    Err(err) => set_status.set(err.to_string()),
                }
            });
        });
    }

    let pixel_ratio = config.pixel_ratio(device_pixel_ratio());
    let toolbar_sync = Rc::clone(&sync);

    view! {
        <div class="trading-app">
            <Toolbar
                drawing_store=drawing_store
                trading_store=trading_store
                sync=toolbar_sync
                set_status=set_status
            />
            <ChartView
                width=config.chart_width
                height=config.chart_height
                pixel_ratio=pixel_ratio
                drawing_store=drawing_store
                indicator_store=indicator_store
                trading_store=trading_store
                candles=candles
                sync=sync
                set_status=set_status
                set_range=set_range
            />
            <LowerPanel
                width=config.chart_width
                pixel_ratio=pixel_ratio
                indicator_store=indicator_store
                candles=candles
            />
            <IndicatorPanel indicator_store=indicator_store />
            <StatusLine status=status range=range drawing_store=drawing_store />
        </div>
    }
}

#[component]
fn Toolbar(
    drawing_store: DrawingStore,
    trading_store: TradingStore,
    sync: Rc<AppDrawingSync>,
    set_status: WriteSignal<String>,
) -> impl IntoView {
    let tools = DrawingTool::iter()
        .map(|tool| {
            view! {
                <button
                    class="tool-btn"
                    class:active=move || drawing_store.active_tool() == tool
                    title=tool.title()
                    on:click=move |_| drawing_store.set_active_tool(tool)
                >
                    {tool.title()}
                </button>
            }
        })
        .collect_view();

    let timeframes = TimeInterval::iter()
        .map(|tf| {
            let name = tf.as_wire_str().to_string();
            view! {
                <option value=name.clone() selected=move || trading_store.timeframe() == tf>
                    {name.clone()}
                </option>
            }
        })
        .collect_view();

    let chart_types = ChartType::iter()
        .map(|ct| {
            view! {
                <option value=ct.as_ref().to_string() selected=move || trading_store.chart_type() == ct>
                    {ct.to_string()}
                </option>
            }
        })
        .collect_view();

    let on_clear = move |_| {
        let sync = Rc::clone(&sync);
        spawn_local(async move {
            match sync.clear_all_persistent().await {
                Ok(()) => set_status.set("All drawings cleared".to_string()),
                Err(err) => set_status.set(err.to_string()),
            }
        });
    };

    view! {
        <div class="toolbar">
            <input
                type="text"
                class="symbol-input"
                placeholder="Symbol"
                prop:value=move || trading_store.symbol().map(|s| s.to_string()).unwrap_or_default()
                on:change=move |ev| trading_store.set_symbol(Symbol::new(event_target_value(&ev)).ok())
            />
            <select on:change=move |ev| {
                if let Ok(tf) = event_target_value(&ev).parse::<TimeInterval>() {
                    trading_store.set_timeframe(tf);
                }
            }>
                {timeframes}
            </select>
            <select on:change=move |ev| {
                if let Ok(ct) = event_target_value(&ev).parse::<ChartType>() {
                    trading_store.set_chart_type(ct);
                }
            }>
                {chart_types}
            </select>
            <div class="tools">{tools}</div>
            <button class="clear-btn" on:click=on_clear>"Clear all"</button>
        </div>
    }
}

/// Main price chart. Owns the controller; effects keep it in step with the
/// stores and every change is repainted.
#[component]
#[allow(clippy::too_many_arguments)]
fn ChartView(
    width: u32,
    height: u32,
    pixel_ratio: f64,
    drawing_store: DrawingStore,
    indicator_store: IndicatorStore,
    trading_store: TradingStore,
    candles: RwSignal<Vec<Candle>>,
    sync: Rc<AppDrawingSync>,
    set_status: WriteSignal<String>,
    set_range: WriteSignal<Option<VisibleRange>>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<Canvas>();
    let controller: Rc<RefCell<Option<ChartController>>> = Rc::new(RefCell::new(None));

    let repaint: Rc<dyn Fn()> = {
        let controller = Rc::clone(&controller);
        Rc::new(move || {
            let Some(canvas) = canvas_ref.get_untracked() else { return };
            if let Ok(slot) = controller.try_borrow() {
                if let Some(ctrl) = slot.as_ref() {
                    paint_host(ctrl.host(), &canvas);
                }
            }
        })
    };

    // Bumped by window resizes and the retry button while no host exists.
    let host_attempt = create_rw_signal(0u32);
    let host_failed = create_rw_signal(false);
    let resize_handle = window_event_listener(ev::resize, move |_| {
        if host_failed.get_untracked() {
            host_attempt.update(|n| *n += 1);
        }
    });
    on_cleanup(move || resize_handle.remove());

    // Build the host once the canvas is mounted and laid out.
    {
        let controller = Rc::clone(&controller);
        let repaint = Rc::clone(&repaint);
        create_effect(move |_| {
            host_attempt.track();
            let Some(canvas) = canvas_ref.get() else { return };
            if controller.borrow().is_some() {
                return;
            }
            // A canvas inside a hidden container has no layout size yet.
            let (measured_width, measured_height) = (canvas.client_width(), canvas.client_height());
            match ChartHost::from_measured(measured_width, measured_height, pixel_ratio) {
                Ok(mut host) => {
                    host.subscribe_visible_range_change(move |range| set_range.set(Some(range)));
                    let mut ctrl = ChartController::new(host);
                    untrack(|| {
                        ctrl.set_chart_type(trading_store.chart_type(), &indicator_store.main_panel());
                        ctrl.set_market_data(candles.get(), &indicator_store.main_panel());
                        ctrl.refresh_from_store(&drawing_store);
                        ctrl.follow_tool(drawing_store.active_tool());
                    });
                    *controller.borrow_mut() = Some(ctrl);
                    host_failed.set(false);
                    log_info!(LogComponent::Presentation("ChartView"), "chart host ready ({}x{} @{})", measured_width, measured_height, pixel_ratio);
                    repaint();
                }
                Err(err) => {
                    host_failed.set(true);
                    set_status.set(format!("{err}; resize the window or retry"));
                }
            }
        });
    }

    {
        let (controller, repaint) = (Rc::clone(&controller), Rc::clone(&repaint));
        create_effect(move |_| {
            let data = candles.get();
            let main = untrack(|| indicator_store.main_panel());
            update_chart(&controller, &*repaint, |ctrl| ctrl.set_market_data(data, &main));
        });
    }

    {
        let (controller, repaint) = (Rc::clone(&controller), Rc::clone(&repaint));
        create_effect(move |_| {
            let main = indicator_store.main_panel();
            let chart_type = trading_store.chart_type();
            update_chart(&controller, &*repaint, |ctrl| ctrl.set_chart_type(chart_type, &main));
        });
    }

    {
        let (controller, repaint) = (Rc::clone(&controller), Rc::clone(&repaint));
        create_effect(move |_| {
            let snapshot = drawing_store.snapshot();
            update_chart(&controller, &*repaint, |ctrl| ctrl.host_mut().sync_drawings(&snapshot));
        });
    }

    {
        let (controller, repaint) = (Rc::clone(&controller), Rc::clone(&repaint));
        create_effect(move |_| {
            let tool = drawing_store.active_tool();
            update_chart(&controller, &*repaint, |ctrl| ctrl.follow_tool(tool));
        });
    }

    let drag_origin: Rc<Cell<Option<(f64, f64)>>> = Rc::new(Cell::new(None));
    let dragged = Rc::new(Cell::new(false));

    let on_mouse_down = {
        let drag_origin = Rc::clone(&drag_origin);
        let dragged = Rc::clone(&dragged);
        move |ev: web_sys::MouseEvent| {
            drag_origin.set(Some((ev.offset_x() as f64, ev.offset_y() as f64)));
            dragged.set(false);
        }
    };

    let on_mouse_move = {
        let drag_origin = Rc::clone(&drag_origin);
        let dragged = Rc::clone(&dragged);
        let (controller, repaint) = (Rc::clone(&controller), Rc::clone(&repaint));
        move |ev: web_sys::MouseEvent| {
            let Some((x0, y0)) = drag_origin.get() else { return };
            let (x, y) = (ev.offset_x() as f64, ev.offset_y() as f64);
            let (dx, dy) = (x - x0, y - y0);
            if !dragged.get() && dx.abs() + dy.abs() < DRAG_THRESHOLD {
                return;
            }
            dragged.set(true);
            drag_origin.set(Some((x, y)));
            update_chart(&controller, &*repaint, |ctrl| {
                let (w, h) = ctrl.host().media_size();
                ctrl.host_mut().pan(-dx / w, dy / h)
            });
        }
    };

    let on_mouse_up = {
        let drag_origin = Rc::clone(&drag_origin);
        move |_: web_sys::MouseEvent| drag_origin.set(None)
    };

    let on_wheel = {
        let (controller, repaint) = (Rc::clone(&controller), Rc::clone(&repaint));
        move |ev: web_sys::WheelEvent| {
            ev.prevent_default();
            let factor = if ev.delta_y() < 0.0 { 1.1 } else { 1.0 / 1.1 };
            let (x, y) = (ev.offset_x() as f64, ev.offset_y() as f64);
            let shift = ev.shift_key();
            update_chart(&controller, &*repaint, |ctrl| {
                let (w, h) = ctrl.host().media_size();
                if shift {
                    ctrl.host_mut().zoom_price(factor, y / h);
                } else {
                    ctrl.host_mut().zoom(factor, x / w);
                }
            });
        }
    };

    let on_click = {
        let controller = Rc::clone(&controller);
        let repaint = Rc::clone(&repaint);
        let dragged = Rc::clone(&dragged);
        move |ev: web_sys::MouseEvent| {
            if dragged.get() {
                return;
            }
            let (x, y) = (ev.offset_x() as f64, ev.offset_y() as f64);
            // The store write inside fires effects that find the controller
            // busy, so the overlays are refreshed explicitly afterwards.
            let completed = controller
                .borrow_mut()
                .as_mut()
                .and_then(|ctrl| ctrl.handle_click_px(&drawing_store, x, y));
            let Some(drawing) = completed else { return };
            if let Some(ctrl) = controller.borrow_mut().as_mut() {
                ctrl.refresh_from_store(&drawing_store);
            }
            repaint();

            let sync = Rc::clone(&sync);
            spawn_local(async move {
                match sync.save(drawing).await {
                    Ok(Some(record)) => set_status.set(format!("Saved drawing {}", record.id)),
                    Ok(None) => set_status.set("Drawing kept locally: no user or symbol to save it under".to_string()),
                    Err(err) => set_status.set(err.to_string()),
                }
            });
        }
    };

    {
        let controller = Rc::clone(&controller);
        on_cleanup(move || {
            if let Some(mut ctrl) = controller.borrow_mut().take() {
                ctrl.host_mut().detach_all();
            }
        });
    }

    let style = move || {
        let cursor = if drawing_store.active_tool() == DrawingTool::None { "grab" } else { "crosshair" };
        format!("width: {width}px; height: {height}px; cursor: {cursor};")
    };

    view! {
        <div class="chart-view">
            <canvas
                node_ref=canvas_ref
                style=style
                on:click=on_click
                on:mousedown=on_mouse_down
                on:mousemove=on_mouse_move
                on:mouseup=on_mouse_up.clone()
                on:mouseleave=on_mouse_up
                on:wheel=on_wheel
            />
            <Show when=move || host_failed.get()>
                <button class="retry" on:click=move |_| host_attempt.update(|n| *n += 1)>"Retry chart"</button>
            </Show>
        </div>
    }
}

/// Sub-chart for oscillators, rebuilt whenever its indicators or the candles change.
#[component]
fn LowerPanel(
    width: u32,
    pixel_ratio: f64,
    indicator_store: IndicatorStore,
    candles: RwSignal<Vec<Candle>>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<Canvas>();

    create_effect(move |_| {
        let lower = indicator_store.lower_panel();
        let data = candles.get();
        let Some(canvas) = canvas_ref.get() else { return };
        if lower.is_empty() {
            return;
        }
        let mut host = match ChartHost::new(width, LOWER_PANEL_HEIGHT, pixel_ratio) {
            Ok(host) => host,
            Err(err) => {
                log_error!(LogComponent::Presentation("LowerPanel"), "{}", err);
                return;
            }
        };
        host.fit_to_candles(&data);
        let lines = indicator_lines(&data, &lower);
        let values: Vec<f64> = lines.iter().flat_map(|line| line.values()).collect();
        host.fit_prices(values);
        host.set_series(lines.into_iter().map(|line| Box::new(line) as Box<dyn Primitive>).collect());
        paint_host(&host, &canvas);
    });

    let style = move || {
        let display = if indicator_store.lower_panel().is_empty() { "none" } else { "block" };
        format!("width: {width}px; height: {LOWER_PANEL_HEIGHT}px; display: {display};")
    };

    view! { <canvas class="lower-panel" node_ref=canvas_ref style=style /> }
}

#[component]
fn IndicatorPanel(indicator_store: IndicatorStore) -> impl IntoView {
    let (kind, set_kind) = create_signal(IndicatorKind::Sma);
    let kinds = IndicatorKind::iter()
        .map(|k| view! { <option value=k.as_ref().to_string()>{k.to_string()}</option> })
        .collect_view();

    view! {
        <div class="indicator-panel">
            <div class="indicator-add">
                <select on:change=move |ev| {
                    if let Ok(k) = event_target_value(&ev).parse::<IndicatorKind>() {
                        set_kind.set(k);
                    }
                }>
                    {kinds}
                </select>
                <button on:click=move |_| {
                    indicator_store.add_indicator(kind.get_untracked());
                }>"Add indicator"</button>
            </div>
            <For
                each=move || indicator_store.list()
                key=|config| config.id.clone()
                children=move |config| view! { <IndicatorRow config=config indicator_store=indicator_store /> }
            />
        </div>
    }
}

#[component]
fn IndicatorRow(config: IndicatorConfig, indicator_store: IndicatorStore) -> impl IntoView {
    let id = config.id.clone();

    let title = {
        let id = id.clone();
        move || indicator_store.get(&id).map(|c| c.title()).unwrap_or_default()
    };
    let visible = {
        let id = id.clone();
        move || indicator_store.get(&id).is_some_and(|c| c.visible)
    };

    let params = config
        .parameters
        .iter()
        .map(|(name, value)| {
            let id = id.clone();
            let name = name.clone();
            let label = name.clone();
            view! {
                <label class="param">
                    {label}
                    <input
                        type="number"
                        step="any"
                        value=value.to_string()
                        on:change=move |ev| {
                            if let Ok(v) = event_target_value(&ev).parse::<f64>() {
                                indicator_store.set_parameter(&id, &name, v);
                            }
                        }
                    />
                </label>
            }
        })
        .collect_view();

    let (color_id, toggle_id, remove_id) = (id.clone(), id.clone(), id);

    view! {
        <div class="indicator-row">
            <span class="indicator-title">{title}</span>
            <input
                type="color"
                value=config.color.clone()
                on:input=move |ev| indicator_store.set_color(&color_id, &event_target_value(&ev))
            />
            <button on:click=move |_| indicator_store.toggle_visibility(&toggle_id)>
                {move || if visible() { "Hide" } else { "Show" }}
            </button>
            <button on:click=move |_| indicator_store.remove_indicator(&remove_id)>"Remove"</button>
            {params}
        </div>
    }
}

#[component]
fn StatusLine(
    status: ReadSignal<String>,
    range: ReadSignal<Option<VisibleRange>>,
    drawing_store: DrawingStore,
) -> impl IntoView {
    let hint = move || match drawing_store.active_tool() {
        DrawingTool::None => "",
        DrawingTool::Horizontal => "Click to place a horizontal line",
        DrawingTool::Trendline | DrawingTool::Fibonacci => "Click two points on the chart",
    };
    let span = move || {
        range
            .get()
            .map(|r| format!("{:.1}h visible", (r.to - r.from) / 3600.0))
            .unwrap_or_default()
    };

    view! {
        <div class="status-line">
            <span class="status">{move || status.get()}</span>
            <span class="hint">{hint}</span>
            <span class="drawings">{move || format!("{} drawings", drawing_store.len())}</span>
            <span class="range">{span}</span>
        </div>
    }
}
