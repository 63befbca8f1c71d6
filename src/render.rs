use crate::config::RenderConfig;
use crate::graph::Direction;
use crate::highlight::HighlightSets;
use crate::layout::{Layout, LinkLayout, NodeLayout, path_to_svg};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(
    layout: &Layout,
    theme: &Theme,
    config: &RenderConfig,
    highlight: Option<&HighlightSets>,
) -> String {
    let mut svg = String::new();
    let width = layout.width.max(1.0);
    let height = layout.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"dmrs\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    if let Some(surface) = &layout.surface {
        svg.push_str(&format!("<title>{}</title>", escape_xml(surface)));
    }

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    if config.embed_css {
        svg.push_str(&highlight_css(theme));
    }

    svg.push_str("<g class=\"links\">");
    for link in &layout.links {
        svg.push_str(&link_svg(link, theme, highlight));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in &layout.nodes {
        svg.push_str(&node_svg(node, theme, highlight));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn highlight_css(theme: &Theme) -> String {
    format!(
        "<style>\
.dmrs .faded{{opacity:{faded};}}\
.dmrs .node.selected rect{{stroke:{selected};stroke-width:2.5;}}\
.dmrs .node.outbound rect{{stroke:{outbound};stroke-width:2;}}\
.dmrs .node.inbound rect{{stroke:{inbound};stroke-width:2;}}\
.dmrs .node.label-set rect{{fill:{label_set};fill-opacity:0.35;}}\
.dmrs .node.scope rect{{stroke:{scope};stroke-dasharray:4 2;stroke-width:2;}}\
.dmrs .link.emphasis path{{stroke-width:2.2;}}\
</style>",
        faded = theme.faded_opacity,
        selected = theme.selected_color,
        outbound = theme.outbound_color,
        inbound = theme.inbound_color,
        label_set = theme.label_set_color,
        scope = theme.scope_color,
    )
}

fn node_classes(node: &NodeLayout, highlight: Option<&HighlightSets>) -> String {
    let mut classes = vec!["node"];
    if let Some(sets) = highlight {
        if node.id == sets.selected {
            classes.push("selected");
        }
        if sets.outbound.contains(&node.id) {
            classes.push("outbound");
        }
        if sets.inbound.contains(&node.id) {
            classes.push("inbound");
        }
        if sets.label_set.contains(&node.id) && node.id != sets.selected {
            classes.push("label-set");
        }
        if sets.scope.contains(&node.id) {
            classes.push("scope");
        }
        if !sets.involves(node.id) {
            classes.push("faded");
        }
    }
    classes.join(" ")
}

fn node_svg(node: &NodeLayout, theme: &Theme, highlight: Option<&HighlightSets>) -> String {
    let mut out = format!(
        "<g class=\"{}\" data-node-id=\"{}\" data-index=\"{}\">",
        node_classes(node, highlight),
        node.id,
        node.index
    );
    out.push_str(&format!("<title>{}</title>", escape_xml(&tooltip(node))));
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.2\"/>",
        node.x, node.y, node.width, node.height, theme.node_fill, theme.node_border_color
    ));
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        node.center_x(),
        node.y + node.height / 2.0,
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.node_text_color,
        escape_xml(&node.label)
    ));
    out.push_str("</g>");
    out
}

/// Tooltip lines: relation name, constant, surface span, category, then the
/// grammatical properties in document order.
pub fn tooltip(node: &NodeLayout) -> String {
    let record = &node.record;
    let mut lines = vec![record.pred.mrs_string()];
    if let Some(carg) = &record.carg {
        lines.push(format!("CARG: \"{carg}\""));
    }
    if let Some((cfrom, cto)) = record.span() {
        lines.push(format!("<{cfrom}:{cto}>"));
    }
    if let Some(cvarsort) = &record.cvarsort {
        lines.push(format!("cvarsort: {cvarsort}"));
    }
    for (name, value) in &record.properties {
        lines.push(format!("{name}: {value}"));
    }
    lines.join("\n")
}

fn link_emphasised(link: &LinkLayout, sets: &HighlightSets) -> bool {
    let touches = link.from == Some(sets.selected) || link.to == sets.selected;
    let inside_label = link.post == "EQ"
        && link.from.is_some_and(|from| sets.label_set.contains(&from))
        && sets.label_set.contains(&link.to);
    touches || inside_label
}

fn link_svg(link: &LinkLayout, theme: &Theme, highlight: Option<&HighlightSets>) -> String {
    let side = if link.is_top {
        "top"
    } else {
        match link.direction {
            Direction::Above => "above",
            Direction::Below => "below",
        }
    };
    let mut classes = vec!["link", side];
    if let Some(sets) = highlight {
        classes.push(if link_emphasised(link, sets) {
            "emphasis"
        } else {
            "faded"
        });
    }
    let stroke = if link.is_top {
        &theme.top_color
    } else {
        &theme.line_color
    };
    let dash = if link.post == "EQ" && link.rargname.is_empty() {
        " stroke-dasharray=\"4 3\""
    } else {
        ""
    };
    let marker = if link.arrow {
        " marker-end=\"url(#arrow)\""
    } else {
        ""
    };

    let mut out = format!(
        "<g class=\"{}\" data-from=\"{}\" data-to=\"{}\" data-role=\"{}\" data-post=\"{}\" data-level=\"{}\">",
        classes.join(" "),
        link.from.map(|id| id.to_string()).unwrap_or_default(),
        link.to,
        escape_xml(&link.rargname),
        escape_xml(&link.post),
        link.level
    );
    out.push_str(&format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.3\"{}{} />",
        path_to_svg(&link.path),
        stroke,
        dash,
        marker
    ));
    let baseline = match link.direction {
        Direction::Above => "auto",
        Direction::Below => "hanging",
    };
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        link.label_anchor.0,
        link.label_anchor.1,
        baseline,
        escape_xml(&theme.font_family),
        theme.link_font_size,
        theme.link_label_color,
        escape_xml(&link.label)
    ));
    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
