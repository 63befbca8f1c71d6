use serde::Serialize;
use std::fmt::Write as _;

use crate::config::LayoutConfig;
use crate::graph::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum PathCommand {
    Move { x: f32, y: f32 },
    Line { x: f32, y: f32 },
    /// Quadratic curve through control point `(cx, cy)`.
    Quad { cx: f32, cy: f32, x: f32, y: f32 },
}

pub fn path_to_svg(path: &[PathCommand]) -> String {
    let mut d = String::new();
    for (idx, cmd) in path.iter().enumerate() {
        if idx > 0 {
            d.push(' ');
        }
        let _ = match *cmd {
            PathCommand::Move { x, y } => write!(d, "M {x:.2} {y:.2}"),
            PathCommand::Line { x, y } => write!(d, "L {x:.2} {y:.2}"),
            PathCommand::Quad { cx, cy, x, y } => write!(d, "Q {cx:.2} {cy:.2} {x:.2} {y:.2}"),
        };
    }
    d
}

/// Vertical extent of the node row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLine {
    pub top: f32,
    pub bottom: f32,
}

impl NodeLine {
    /// Maps a distance from the line onto absolute y. Arcs below the line are
    /// the mirror image of arcs above it.
    fn y(&self, direction: Direction, distance: f32) -> f32 {
        match direction {
            Direction::Above => self.top - distance,
            Direction::Below => self.bottom + distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcGeometry {
    pub path: Vec<PathCommand>,
    pub label_anchor: (f32, f32),
}

/// Distance from the node line to the horizontal run of lane `level`.
pub fn lane_distance(level: i32, config: &LayoutConfig) -> f32 {
    level.unsigned_abs() as f32 * config.lane_height
}

/// Rounded-corner arc from `start_x` to `end_x` running along lane `level`.
pub fn arc_geometry(
    start_x: f32,
    end_x: f32,
    level: i32,
    direction: Direction,
    line: NodeLine,
    config: &LayoutConfig,
) -> ArcGeometry {
    let lane = lane_distance(level, config);
    let lead_in = config.lead_in.min(lane);
    let dx = if end_x >= start_x { 1.0 } else { -1.0 };
    let radius = config
        .corner_radius
        .min((end_x - start_x).abs() / 2.0)
        .min(lane - lead_in)
        .max(0.0);
    let y = |distance: f32| line.y(direction, distance);

    let path = vec![
        PathCommand::Move { x: start_x, y: y(0.0) },
        PathCommand::Line {
            x: start_x,
            y: y(lead_in),
        },
        PathCommand::Line {
            x: start_x,
            y: y(lane - radius),
        },
        PathCommand::Quad {
            cx: start_x,
            cy: y(lane),
            x: start_x + radius * dx,
            y: y(lane),
        },
        PathCommand::Line {
            x: end_x - radius * dx,
            y: y(lane),
        },
        PathCommand::Quad {
            cx: end_x,
            cy: y(lane),
            x: end_x,
            y: y(lane - radius),
        },
        PathCommand::Line {
            x: end_x,
            y: y(lead_in),
        },
        PathCommand::Line { x: end_x, y: y(0.0) },
    ];

    ArcGeometry {
        path,
        label_anchor: ((start_x + end_x) / 2.0, y(lane + config.label_offset)),
    }
}

/// Straight drop from the TOP lane onto the target node.
pub fn top_geometry(x: f32, top_level: i32, line: NodeLine, config: &LayoutConfig) -> ArcGeometry {
    let lane = lane_distance(top_level, config);
    let y = |distance: f32| line.y(Direction::Above, distance);
    ArcGeometry {
        path: vec![
            PathCommand::Move { x, y: y(lane) },
            PathCommand::Line { x, y: y(0.0) },
        ],
        label_anchor: (x, y(lane + config.label_offset)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: NodeLine = NodeLine {
        top: 100.0,
        bottom: 130.0,
    };

    fn config() -> LayoutConfig {
        LayoutConfig {
            lane_height: 20.0,
            corner_radius: 5.0,
            lead_in: 4.0,
            label_offset: 3.0,
            ..LayoutConfig::default()
        }
    }

    fn ys(path: &[PathCommand]) -> Vec<f32> {
        path.iter()
            .map(|cmd| match *cmd {
                PathCommand::Move { y, .. } | PathCommand::Line { y, .. } | PathCommand::Quad { y, .. } => y,
            })
            .collect()
    }

    #[test]
    fn arc_above_runs_along_its_lane() {
        let geom = arc_geometry(10.0, 90.0, 2, Direction::Above, LINE, &config());
        assert_eq!(geom.path.first(), Some(&PathCommand::Move { x: 10.0, y: 100.0 }));
        assert_eq!(geom.path.last(), Some(&PathCommand::Line { x: 90.0, y: 100.0 }));
        assert_eq!(geom.path[4], PathCommand::Line { x: 85.0, y: 60.0 });
        assert!(ys(&geom.path).iter().all(|y| (60.0..=100.0).contains(y)));
        assert_eq!(geom.label_anchor, (50.0, 57.0));
    }

    #[test]
    fn arc_below_is_mirrored() {
        let above = arc_geometry(10.0, 90.0, 2, Direction::Above, LINE, &config());
        let below = arc_geometry(10.0, 90.0, -2, Direction::Below, LINE, &config());
        for (a, b) in ys(&above.path).iter().zip(ys(&below.path)) {
            assert!(((LINE.top - a) - (b - LINE.bottom)).abs() < 1e-4);
        }
        assert_eq!(below.label_anchor, (50.0, 173.0));
    }

    #[test]
    fn leftward_arc_turns_the_other_way() {
        let geom = arc_geometry(90.0, 10.0, 1, Direction::Above, LINE, &config());
        assert_eq!(
            geom.path[3],
            PathCommand::Quad {
                cx: 90.0,
                cy: 80.0,
                x: 85.0,
                y: 80.0
            }
        );
    }

    #[test]
    fn radius_shrinks_for_narrow_arcs() {
        let geom = arc_geometry(10.0, 14.0, 1, Direction::Above, LINE, &config());
        assert_eq!(geom.path[4], PathCommand::Line { x: 12.0, y: 80.0 });
    }

    #[test]
    fn top_link_is_a_straight_drop() {
        let geom = top_geometry(40.0, 3, LINE, &config());
        assert_eq!(
            geom.path,
            [
                PathCommand::Move { x: 40.0, y: 40.0 },
                PathCommand::Line { x: 40.0, y: 100.0 }
            ]
        );
        assert_eq!(path_to_svg(&geom.path), "M 40.00 40.00 L 40.00 100.00");
    }
}
