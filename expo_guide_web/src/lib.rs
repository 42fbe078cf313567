use leptos::*;

use expo_guide::{compute_metrics, summary_table, RoiInputs, VenueTable, EXPORT_FILENAME};

pub mod figures;

use figures::{fmt_amount, parse_amount, parse_count, parse_rate};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_COMMIT: &str = env!("EXPO_GUIDE_COMMIT");

const MAP_DIV_ID: &str = "venue_map";
const BAR_DIV_ID: &str = "roi_bar";
const GAUGE_DIV_ID: &str = "roi_gauge";

#[cfg(feature = "js_charts")]
use wasm_bindgen::{JsCast, JsValue};

#[cfg(feature = "js_charts")]
use expo_guide::{comparison_chart, roi_gauge, VenueSelection, EXPORT_MIME};

#[cfg(feature = "js_charts")]
use figures::{comparison_figure, gauge_figure};

#[cfg(feature = "js_charts")]
fn to_js(value: &serde_json::Value) -> JsValue {
    use serde::Serialize;
    // Plain objects, not `Map`s: Plotly and Leaflet read properties.
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::UNDEFINED)
}

#[cfg(feature = "js_charts")]
fn js_global(name: &str) -> Option<JsValue> {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

#[cfg(feature = "js_charts")]
fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Option<JsValue> {
    let func = js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()?;
    let arr = js_sys::Array::new();
    for arg in args {
        arr.push(arg);
    }
    func.apply(target, &arr).ok()
}

#[cfg(feature = "js_charts")]
fn plot(div_id: &str, traces: &serde_json::Value, layout: &serde_json::Value) {
    let Some(plotly) = js_global("Plotly") else {
        return;
    };
    let Some(div) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(div_id))
    else {
        return;
    };
    let config = to_js(&serde_json::json!({ "responsive": true, "displaylogo": false }));
    let args = [JsValue::from(div), to_js(traces), to_js(layout), config];
    if call_method(&plotly, "react", &args).is_none() {
        let _ = call_method(&plotly, "newPlot", &args);
    }
}

/// Leaflet refuses to re-initialise a container, so every selection gets a
/// fresh inner element.
#[cfg(feature = "js_charts")]
fn draw_venue_map(div_id: &str, selection: &VenueSelection) {
    let Some(leaflet) = js_global("L") else {
        return;
    };
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(container) = document.get_element_by_id(div_id) else {
        return;
    };
    container.set_inner_html("");
    let Ok(canvas) = document.create_element("div") else {
        return;
    };
    let _ = canvas.set_attribute("style", "width:100%;height:400px;");
    if container.append_child(&canvas).is_err() {
        return;
    }

    let Some(map) = call_method(&leaflet, "map", &[JsValue::from(canvas)]) else {
        return;
    };
    let center = to_js(&serde_json::json!([selection.center.lat, selection.center.lng]));
    call_method(
        &map,
        "setView",
        &[center, JsValue::from_f64(selection.zoom as f64)],
    );
    let tile_opts = to_js(&serde_json::json!({
        "maxZoom": 19,
        "attribution": "&copy; OpenStreetMap contributors",
    }));
    if let Some(tiles) = call_method(
        &leaflet,
        "tileLayer",
        &[
            JsValue::from_str("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
            tile_opts,
        ],
    ) {
        call_method(&tiles, "addTo", &[map.clone()]);
    }

    for marker in &selection.markers {
        let pos = to_js(&serde_json::json!([marker.position.lat, marker.position.lng]));
        let opts = to_js(&serde_json::json!({
            "radius": 10,
            "color": marker.color.as_str(),
            "fillColor": marker.color.as_str(),
            "fillOpacity": 0.8,
        }));
        if let Some(layer) = call_method(&leaflet, "circleMarker", &[pos, opts]) {
            call_method(&layer, "bindPopup", &[JsValue::from_str(&marker.label)]);
            call_method(&layer, "addTo", &[map.clone()]);
        }
    }
}

#[cfg(feature = "js_charts")]
fn csv_download_url(csv: &str) -> Option<String> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(csv));
    let opts = web_sys::BlobPropertyBag::new();
    opts.set_type(EXPORT_MIME);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &opts).ok()?;
    web_sys::Url::create_object_url_with_blob(&blob).ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tool {
    TaxiFinder,
    RoiCalculator,
}

#[component]
pub fn App() -> impl IntoView {
    let (tool, set_tool) = create_signal(Tool::TaxiFinder);

    view! {
        <main class="expo">
            <header>
                <nav class="tools">
                    <button class:active=move || tool.get() == Tool::TaxiFinder
                        on:click=move |_| set_tool.set(Tool::TaxiFinder)>"🚖 Taxi Finder"</button>
                    <button class:active=move || tool.get() == Tool::RoiCalculator
                        on:click=move |_| set_tool.set(Tool::RoiCalculator)>"📊 Booth ROI"</button>
                </nav>
                <p class="note">{"Web version "}{APP_VERSION}{" ("}{APP_COMMIT}{")"}</p>
            </header>
            {move || match tool.get() {
                Tool::TaxiFinder => view! { <TaxiFinder/> }.into_view(),
                Tool::RoiCalculator => view! { <RoiCalculator/> }.into_view(),
            }}
        </main>
    }
}

#[component]
fn TaxiFinder() -> impl IntoView {
    let table = store_value(VenueTable::builtin());
    let first_key = table.with_value(|t| {
        t.venues()
            .first()
            .map(|v| v.key.clone())
            .unwrap_or_default()
    });
    let (venue_key, set_venue_key) = create_signal(first_key);
    let selection = create_memo(move |_| table.with_value(|t| t.select(&venue_key.get()).ok()));

    #[cfg(feature = "js_charts")]
    create_effect(move |_| {
        if let Some(sel) = selection.get() {
            draw_venue_map(MAP_DIV_ID, &sel);
        }
    });

    let options = table.with_value(|t| {
        t.venues()
            .iter()
            .map(|v| {
                let key = v.key.clone();
                let name = v.name.clone();
                view! { <option value=key>{name}</option> }
            })
            .collect_view()
    });

    view! {
        <section class="tool taxi">
            <h1>"🚖 전시장 택시 승강장 안내"</h1>
            <p>"관람하고 계신 "<strong>"전시장"</strong>"을 선택해주세요."</p>
            <label class="field">"어디에 계신가요?"
                <select
                    on:change=move |ev| set_venue_key.set(event_target_value(&ev))
                    prop:value=move || venue_key.get()
                >
                    {options}
                </select>
            </label>
            {move || selection.get().map(|sel| view! {
                <p class="success">"📍 "<strong>"택시 타는 곳: "</strong>{sel.description.clone()}</p>
                <p class="note">{format!("승강장까지 약 {:.0} m", sel.walk_distance_m)}</p>
            })}
            <div id=MAP_DIV_ID class="map"></div>
            <h3>"🏃 길찾기 앱으로 바로 연결"</h3>
            {move || selection.get().map(|sel| view! {
                <div class="columns">
                    <a class="btn naver" href=sel.links.naver.clone() target="_blank" rel="noopener">
                        "🟢 네이버 지도로 길찾기"
                    </a>
                    <a class="btn kakao" href=sel.links.kakao.clone() target="_blank" rel="noopener">
                        "🟡 카카오맵으로 길찾기"
                    </a>
                </div>
            })}
            <p class="info">"👆 위 버튼을 누르면 현재 위치에서 승강장까지의 "<strong>"도보 경로"</strong>"가 안내됩니다."</p>
        </section>
    }
}

fn amount_field(label: &'static str, value: RwSignal<f64>, step: &'static str) -> impl IntoView {
    view! {
        <label class="field">{label}
            <input type="number" min="0" step=step
                prop:value=move || value.get().to_string()
                on:input=move |ev| {
                    if let Some(v) = parse_amount(&event_target_value(&ev)) {
                        value.set(v);
                    }
                }
            />
        </label>
    }
}

#[component]
fn RoiCalculator() -> impl IntoView {
    let defaults = RoiInputs::default();
    let booth = create_rw_signal(defaults.booth_cost);
    let staff = create_rw_signal(defaults.staff_cost);
    let marketing = create_rw_signal(defaults.marketing_cost);
    let misc = create_rw_signal(defaults.misc_cost);
    let leads = create_rw_signal(defaults.leads);
    let rate = create_rw_signal(defaults.conversion_rate_pct);
    let deal_value = create_rw_signal(defaults.deal_value);

    let inputs = create_memo(move |_| RoiInputs {
        booth_cost: booth.get(),
        staff_cost: staff.get(),
        marketing_cost: marketing.get(),
        misc_cost: misc.get(),
        leads: leads.get(),
        conversion_rate_pct: rate.get(),
        deal_value: deal_value.get(),
    });
    let metrics = create_memo(move |_| compute_metrics(&inputs.get()));
    let summary = create_memo(move |_| summary_table(&inputs.get(), &metrics.get()));
    let (csv_href, set_csv_href) = create_signal(String::new());
    let (status, set_status) = create_signal(String::new());

    #[cfg(feature = "js_charts")]
    create_effect(move |_| {
        let m = metrics.get();
        let (traces, layout) = comparison_figure(&comparison_chart(&m));
        plot(BAR_DIV_ID, &traces, &layout);
        let (traces, layout) = gauge_figure(&roi_gauge(&m));
        plot(GAUGE_DIV_ID, &traces, &layout);
    });

    #[cfg(feature = "js_charts")]
    create_effect(move |_| {
        let old = csv_href.get_untracked();
        if !old.is_empty() {
            let _ = web_sys::Url::revoke_object_url(&old);
        }
        match summary.get().to_csv_string() {
            Ok(csv) => {
                set_csv_href.set(csv_download_url(&csv).unwrap_or_default());
                set_status.set(String::new());
            }
            Err(err) => {
                set_csv_href.set(String::new());
                set_status.set(format!("CSV export failed: {err}"));
            }
        }
    });

    let table_rows = move || {
        summary
            .get()
            .rows
            .into_iter()
            .map(|row| view! { <tr><th>{row.label}</th><td>{row.value.to_string()}</td></tr> })
            .collect_view()
    };

    view! {
        <section class="tool roi">
            <aside class="sidebar">
                <h2>"💰 비용 입력"</h2>
                {amount_field("Booth Cost", booth, "10")}
                {amount_field("Staff Cost", staff, "10")}
                {amount_field("Marketing Cost", marketing, "10")}
                {amount_field("Misc Cost", misc, "10")}
                <h2>"🎯 성과 가정"</h2>
                <label class="field">"Leads"
                    <input type="number" min="0" step="1"
                        prop:value=move || leads.get().to_string()
                        on:input=move |ev| {
                            if let Some(v) = parse_count(&event_target_value(&ev)) {
                                leads.set(v);
                            }
                        }
                    />
                </label>
                <label class="field">{move || format!("Conversion Rate: {:.1}%", rate.get())}
                    <input type="range" min="0" max="100" step="0.1"
                        prop:value=move || rate.get().to_string()
                        on:input=move |ev| {
                            if let Some(v) = parse_rate(&event_target_value(&ev)) {
                                rate.set(v);
                            }
                        }
                    />
                </label>
                {amount_field("Deal Value", deal_value, "10")}
            </aside>
            <div class="results">
                <h1>"📊 전시회 ROI 시뮬레이터"</h1>
                <div class="metrics">
                    <div class="metric"><span>"Total Cost"</span><strong>{move || fmt_amount(metrics.get().total_cost)}</strong></div>
                    <div class="metric"><span>"Expected Revenue"</span><strong>{move || fmt_amount(metrics.get().expected_revenue)}</strong></div>
                    <div class="metric"><span>"Profit"</span><strong>{move || fmt_amount(metrics.get().profit)}</strong></div>
                    <div class="metric"><span>"ROI"</span><strong>{move || format!("{:.1}%", metrics.get().roi_pct)}</strong></div>
                    <div class="metric"><span>"Cost per Lead"</span><strong>{move || fmt_amount(metrics.get().cost_per_lead)}</strong></div>
                </div>
                <div class="columns">
                    <div id=BAR_DIV_ID class="plot"></div>
                    <div id=GAUGE_DIV_ID class="plot"></div>
                </div>
                <table class="summary">
                    <tbody>{table_rows}</tbody>
                </table>
                <a class="btn download"
                    href=move || csv_href.get()
                    download=EXPORT_FILENAME
                    style=move || if csv_href.get().is_empty() { "display:none;" } else { "display:inline-block;" }
                >"📥 결과 다운로드 (CSV)"</a>
                <span class="note">{move || status.get()}</span>
                <p class="note">"All calculations run locally in your browser."</p>
            </div>
        </section>
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(|| view! { <App/> });
}
