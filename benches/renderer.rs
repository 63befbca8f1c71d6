use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dmrs_arc_renderer::config::{LayoutConfig, RenderConfig};
use dmrs_arc_renderer::graph::build_graph;
use dmrs_arc_renderer::layout::{compute_layout, compute_levels};
use dmrs_arc_renderer::parser::parse_dmrs;
use dmrs_arc_renderer::render::render_svg;
use dmrs_arc_renderer::theme::Theme;
use std::hint::black_box;

/// A chain of `nodes` predicates with argument links between neighbours and
/// `extra_links` longer arcs, alternating above and below the line.
fn dense_dmrs_source(nodes: usize, extra_links: usize) -> String {
    let mut out = String::from("<dmrs>\n");
    for i in 0..nodes {
        out.push_str(&format!(
            "<node nodeid=\"{}\" cfrom=\"{}\" cto=\"{}\"><realpred lemma=\"w{}\" pos=\"n\" sense=\"1\"/><sortinfo cvarsort=\"x\"/></node>\n",
            i + 1,
            i * 4,
            i * 4 + 3,
            i
        ));
    }
    if nodes > 0 {
        out.push_str("<link from=\"0\" to=\"1\"><rargname/><post>H</post></link>\n");
    }
    for i in 1..nodes {
        out.push_str(&format!(
            "<link from=\"{}\" to=\"{}\"><rargname>ARG1</rargname><post>NEQ</post></link>\n",
            i + 1,
            i
        ));
    }
    let mut count = 0usize;
    'outer: for i in 0..nodes {
        for j in (i + 2)..nodes {
            if count >= extra_links {
                break 'outer;
            }
            let (role, post) = if count % 2 == 0 { ("ARG2", "NEQ") } else { ("RSTR", "H") };
            out.push_str(&format!(
                "<link from=\"{}\" to=\"{}\"><rargname>{role}</rargname><post>{post}</post></link>\n",
                i + 1,
                j + 1
            ));
            count += 1;
        }
    }
    out.push_str("</dmrs>\n");
    out
}

fn fixture(name: &str) -> &'static str {
    match name {
        "kim_sleeps" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/kim_sleeps.xml"
        )),
        "mouse_ate_cheese" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/mouse_ate_cheese.xml"
        )),
        "lions_eat_zebras" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/lions_eat_zebras.xml"
        )),
        _ => panic!("unknown fixture {name}"),
    }
}

fn layout_config() -> LayoutConfig {
    LayoutConfig {
        fast_text_metrics: true,
        ..LayoutConfig::default()
    }
}

fn bench_end_to_end(c: &mut Criterion) {
    let theme = Theme::classic();
    let config = layout_config();
    let render = RenderConfig::default();
    let mut group = c.benchmark_group("end_to_end");
    for name in ["kim_sleeps", "mouse_ate_cheese", "lions_eat_zebras"] {
        let input = fixture(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| {
                let doc = parse_dmrs(black_box(input)).expect("parse failed");
                let graph = build_graph(&doc, &theme, &config).expect("graph failed");
                let layout = compute_layout(&graph, &theme, &config);
                black_box(render_svg(&layout, &theme, &render, None))
            })
        });
    }
    group.finish();
}

fn bench_levels(c: &mut Criterion) {
    let theme = Theme::classic();
    let config = layout_config();
    let mut group = c.benchmark_group("levels");
    for (nodes, extra) in [(20, 20), (80, 200), (200, 1000)] {
        let doc = parse_dmrs(&dense_dmrs_source(nodes, extra)).expect("parse failed");
        let graph = build_graph(&doc, &theme, &config).expect("graph failed");
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{nodes}n_{extra}x")),
            &graph,
            |b, graph| b.iter(|| black_box(compute_levels(&graph.links, graph.nodes.len()))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_end_to_end, bench_levels);
criterion_main!(benches);
