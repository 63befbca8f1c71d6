use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeOrder {
    /// Nodes appear in the order the document lists them.
    #[default]
    Document,
    /// Stable sort by surface span `(cfrom, cto)`; nodes without a span go last.
    Surface,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_spacing: f32,
    pub node_padding_x: f32,
    pub node_padding_y: f32,
    pub min_node_width: f32,
    pub label_line_height: f32,
    /// Vertical distance between two adjacent arc lanes.
    pub lane_height: f32,
    pub corner_radius: f32,
    /// Straight run between a node edge and the first bend of an arc.
    pub lead_in: f32,
    /// Horizontal offset of an arc's departure point from the node centre.
    pub endpoint_nudge: f32,
    pub label_offset: f32,
    pub margin: f32,
    pub node_order: NodeOrder,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 24.0,
            node_padding_x: 10.0,
            node_padding_y: 6.0,
            min_node_width: 40.0,
            label_line_height: 1.5,
            lane_height: 22.0,
            corner_radius: 5.0,
            lead_in: 4.0,
            endpoint_nudge: 4.0,
            label_offset: 3.0,
            margin: 16.0,
            node_order: NodeOrder::Document,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    /// Emit a `<style>` block with the highlight classes.
    pub embed_css: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 400.0,
            background: "#FFFFFF".to_string(),
            embed_css: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    link_font_size: Option<f32>,
    node_fill: Option<String>,
    node_text_color: Option<String>,
    node_border_color: Option<String>,
    line_color: Option<String>,
    link_label_color: Option<String>,
    top_color: Option<String>,
    selected_color: Option<String>,
    outbound_color: Option<String>,
    inbound_color: Option<String>,
    label_set_color: Option<String>,
    scope_color: Option<String>,
    faded_opacity: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_spacing: Option<f32>,
    node_padding_x: Option<f32>,
    node_padding_y: Option<f32>,
    min_node_width: Option<f32>,
    label_line_height: Option<f32>,
    lane_height: Option<f32>,
    corner_radius: Option<f32>,
    lead_in: Option<f32>,
    endpoint_nudge: Option<f32>,
    label_offset: Option<f32>,
    margin: Option<f32>,
    node_order: Option<NodeOrder>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    embed_css: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme {theme_name:?}"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }

    if let Some(layout) = parsed.layout {
        apply_layout_overrides(&mut config.layout, layout);
    }

    if let Some(v) = parsed.embed_css {
        config.render.embed_css = v;
    }
    config.render.background = config.theme.background.clone();

    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.font_size {
        theme.font_size = v;
    }
    if let Some(v) = vars.link_font_size {
        theme.link_font_size = v;
    }
    if let Some(v) = vars.node_fill {
        theme.node_fill = v;
    }
    if let Some(v) = vars.node_text_color {
        theme.node_text_color = v;
    }
    if let Some(v) = vars.node_border_color {
        theme.node_border_color = v;
    }
    if let Some(v) = vars.line_color {
        theme.line_color = v;
    }
    if let Some(v) = vars.link_label_color {
        theme.link_label_color = v;
    }
    if let Some(v) = vars.top_color {
        theme.top_color = v;
    }
    if let Some(v) = vars.selected_color {
        theme.selected_color = v;
    }
    if let Some(v) = vars.outbound_color {
        theme.outbound_color = v;
    }
    if let Some(v) = vars.inbound_color {
        theme.inbound_color = v;
    }
    if let Some(v) = vars.label_set_color {
        theme.label_set_color = v;
    }
    if let Some(v) = vars.scope_color {
        theme.scope_color = v;
    }
    if let Some(v) = vars.faded_opacity {
        theme.faded_opacity = v.clamp(0.0, 1.0);
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
}

fn apply_layout_overrides(layout: &mut LayoutConfig, file: LayoutConfigFile) {
    if let Some(v) = file.node_spacing {
        layout.node_spacing = v;
    }
    if let Some(v) = file.node_padding_x {
        layout.node_padding_x = v;
    }
    if let Some(v) = file.node_padding_y {
        layout.node_padding_y = v;
    }
    if let Some(v) = file.min_node_width {
        layout.min_node_width = v;
    }
    if let Some(v) = file.label_line_height {
        layout.label_line_height = v;
    }
    if let Some(v) = file.lane_height {
        layout.lane_height = v.max(1.0);
    }
    if let Some(v) = file.corner_radius {
        layout.corner_radius = v.max(0.0);
    }
    if let Some(v) = file.lead_in {
        layout.lead_in = v.max(0.0);
    }
    if let Some(v) = file.endpoint_nudge {
        layout.endpoint_nudge = v;
    }
    if let Some(v) = file.label_offset {
        layout.label_offset = v;
    }
    if let Some(v) = file.margin {
        layout.margin = v;
    }
    if let Some(v) = file.node_order {
        layout.node_order = v;
    }
    if let Some(v) = file.fast_text_metrics {
        layout.fast_text_metrics = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.lane_height, LayoutConfig::default().lane_height);
        assert_eq!(config.render.background, config.theme.background);
    }

    #[test]
    fn applies_theme_and_layout_overrides() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "lineColor": "#000000", "fadedOpacity": 4.0 },
                "layout": { "laneHeight": 30, "nodeOrder": "surface", "fastTextMetrics": true },
                "embedCss": false
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_size, Theme::modern().font_size);
        assert_eq!(config.theme.line_color, "#000000");
        assert_eq!(config.theme.faded_opacity, 1.0);
        assert_eq!(config.layout.lane_height, 30.0);
        assert_eq!(config.layout.node_order, NodeOrder::Surface);
        assert!(config.layout.fast_text_metrics);
        assert!(!config.render.embed_css);
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(parse_config(r#"{ "theme": "neon" }"#).is_err());
    }
}
