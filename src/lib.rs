#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dot;
pub mod error;
pub mod graph;
pub mod highlight;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod xml_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, NodeOrder, RenderConfig};
pub use error::{DmrsError, Result};
pub use graph::{Direction, Graph, GraphLink, GraphNode, build_graph};
pub use highlight::{HighlightSets, SelectionState, highlight_sets};
pub use layout::{Layout, LevelAssignment, assign_levels, compute_layout};
pub use parser::parse_dmrs;
pub use render::render_svg;
pub use theme::Theme;
pub use xml_dump::dump_dmrs;

/// Everything needed to go from DMRS XML to SVG in one call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub selection: SelectionState,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::default()
        }
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
            selection: SelectionState::default(),
        }
    }
}

pub fn render_with_options(xml: &str, options: &RenderOptions) -> Result<String> {
    let doc = parse_dmrs(xml)?;
    let graph = build_graph(&doc, &options.theme, &options.layout)?;
    let layout = compute_layout(&graph, &options.theme, &options.layout);
    let highlight = highlight::highlight_for_state(&graph, options.selection);
    Ok(render_svg(
        &layout,
        &options.theme,
        &options.render,
        highlight.as_ref(),
    ))
}
