use crate::layout::{Layout, PathCommand, path_to_svg};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub surface: Option<String>,
    pub width: f32,
    pub height: f32,
    pub line_top: f32,
    pub line_bottom: f32,
    pub max_top_level: i32,
    pub max_bottom_level: i32,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub index: usize,
    pub id: i64,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub from: Option<i64>,
    pub to: i64,
    pub label: String,
    pub top: bool,
    pub level: i32,
    pub arrow: bool,
    pub d: String,
    pub path: Vec<PathCommand>,
    pub label_anchor: [f32; 2],
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                index: node.index,
                id: node.id,
                label: node.label.clone(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
            })
            .collect();

        let links = layout
            .links
            .iter()
            .map(|link| LinkDump {
                from: link.from,
                to: link.to,
                label: link.label.clone(),
                top: link.is_top,
                level: link.level,
                arrow: link.arrow,
                d: path_to_svg(&link.path),
                path: link.path.clone(),
                label_anchor: [link.label_anchor.0, link.label_anchor.1],
            })
            .collect();

        LayoutDump {
            surface: layout.surface.clone(),
            width: layout.width,
            height: layout.height,
            line_top: layout.line_top,
            line_bottom: layout.line_bottom,
            max_top_level: layout.levels.max_top_level,
            max_bottom_level: layout.levels.max_bottom_level,
            nodes,
            links,
        }
    }
}

pub fn layout_dump_json(layout: &Layout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
