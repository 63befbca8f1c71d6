use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub link_font_size: f32,
    pub node_fill: String,
    pub node_text_color: String,
    pub node_border_color: String,
    pub line_color: String,
    pub link_label_color: String,
    pub top_color: String,
    /// Node and link emphasis colors used while a node is selected.
    pub selected_color: String,
    pub outbound_color: String,
    pub inbound_color: String,
    pub label_set_color: String,
    pub scope_color: String,
    pub faded_opacity: f32,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            link_font_size: 10.0,
            node_fill: "#ECECFF".to_string(),
            node_text_color: "#333333".to_string(),
            node_border_color: "#9370DB".to_string(),
            line_color: "#333333".to_string(),
            link_label_color: "#555555".to_string(),
            top_color: "#9370DB".to_string(),
            selected_color: "#D62728".to_string(),
            outbound_color: "#1F77B4".to_string(),
            inbound_color: "#2CA02C".to_string(),
            label_set_color: "#FF7F0E".to_string(),
            scope_color: "#9467BD".to_string(),
            faded_opacity: 0.25,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            link_font_size: 10.0,
            node_fill: "#F8FAFF".to_string(),
            node_text_color: "#1C2430".to_string(),
            node_border_color: "#C7D2E5".to_string(),
            line_color: "#7A8AA6".to_string(),
            link_label_color: "#4A5568".to_string(),
            top_color: "#5B6B8C".to_string(),
            selected_color: "#E0464E".to_string(),
            outbound_color: "#2F6FDE".to_string(),
            inbound_color: "#2E9E6A".to_string(),
            label_set_color: "#E68A00".to_string(),
            scope_color: "#8A5CD6".to_string(),
            faded_opacity: 0.3,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "classic" | "default" | "base" => Some(Self::classic()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
