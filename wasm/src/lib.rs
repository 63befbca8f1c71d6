use dmrs_arc_renderer::{
    RenderOptions, SelectionState, Theme, build_graph, highlight_sets, parse_dmrs,
    render_with_options,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DmrsRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    lane_height: Option<f32>,
    selected_node_id: Option<i64>,
    embed_css: Option<bool>,
}

fn build_render_options(options: DmrsRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(lane_height) = options.lane_height {
        render_options.layout.lane_height = lane_height.max(1.0);
    }
    if let Some(embed_css) = options.embed_css {
        render_options.render.embed_css = embed_css;
    }
    if let Some(node_id) = options.selected_node_id {
        render_options.selection = SelectionState::default().click(node_id);
    }
    // No system fonts in the browser.
    render_options.layout.fast_text_metrics = true;

    render_options
}

fn parse_options(options_json: Option<String>) -> Result<DmrsRenderOptions, JsValue> {
    match options_json {
        Some(raw_options) => serde_json::from_str::<DmrsRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(DmrsRenderOptions::default()),
    }
}

#[wasm_bindgen]
pub fn render_dmrs_svg(xml: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = build_render_options(parse_options(options_json)?);
    render_with_options(xml, &render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Highlight sets for `node_id` as JSON (`selected`, `outbound`, `inbound`,
/// `labelSet`, `scope`), or `null` when the node does not exist.
#[wasm_bindgen]
pub fn dmrs_highlight(xml: &str, node_id: i64) -> Result<String, JsValue> {
    highlight_json(xml, node_id).map_err(|error| JsValue::from_str(&error))
}

fn highlight_json(xml: &str, node_id: i64) -> Result<String, String> {
    let doc = parse_dmrs(xml).map_err(|error| error.to_string())?;
    let mut options = RenderOptions::classic();
    options.layout.fast_text_metrics = true;
    let graph = build_graph(&doc, &Theme::classic(), &options.layout).map_err(|error| error.to_string())?;
    serde_json::to_string(&highlight_sets(&graph, node_id)).map_err(|error| error.to_string())
}
