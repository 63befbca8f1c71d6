use crate::ir::Document;
use std::fmt::Write as _;

/// Graphviz rendering of a document: boxed predicate nodes with their
/// category underneath, labelled argument edges, and a dotted edge from a
/// bold `top` node to the TOP target.
pub fn to_dot(doc: &Document) -> String {
    let mut out = String::from("digraph g {\n");
    let top = doc.top();
    if top.is_some() {
        out.push_str("NodeTop [label=\"top\",style=bold];\n");
    }
    out.push_str("node[shape=box];\n");
    for node in &doc.nodes {
        let carg = node
            .carg
            .as_ref()
            .map(|carg| format!("(\"{}\")", escape_html(carg)))
            .unwrap_or_default();
        let category = sortinfo_text(node.cvarsort.as_deref(), &node.properties);
        let _ = writeln!(
            out,
            "{} [label=<{}{}<BR /><FONT POINT-SIZE=\"10\">{}</FONT>>];",
            dot_id(node.node_id),
            escape_html(&node.pred.to_string()),
            carg,
            escape_html(&category)
        );
    }
    out.push_str("edge[fontsize=10];\n");
    if let Some(top) = top {
        let _ = writeln!(out, "NodeTop -> {} [style=dotted];", dot_id(top));
    }
    for link in doc.links.iter().filter(|link| !link.is_top()) {
        let _ = writeln!(
            out,
            "{} -> {} [label=\"{}/{}\"];",
            dot_id(link.from),
            dot_id(link.to),
            link.rargname,
            link.post
        );
    }
    out.push_str("}\n");
    out
}

fn dot_id(node_id: i64) -> String {
    format!("Node{}", node_id.to_string().replace('-', "M"))
}

fn sortinfo_text(cvarsort: Option<&str>, properties: &crate::ir::Properties) -> String {
    let mut parts: Vec<String> = cvarsort.map(|c| vec![c.to_string()]).unwrap_or_default();
    parts.extend(properties.iter().map(|(name, value)| format!("{name}={value}")));
    if parts.is_empty() {
        String::new()
    } else {
        format!("[{}]", parts.join(" "))
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_dmrs;

    #[test]
    fn emits_nodes_edges_and_top() {
        let doc = parse_dmrs(
            r#"<dmrs>
<node nodeid="-1"><realpred lemma="the" pos="q"/><sortinfo/></node>
<node nodeid="2" carg="Kim"><gpred>named_rel</gpred><sortinfo cvarsort="x" num="sg"/></node>
<link from="0" to="2"><rargname/><post>H</post></link>
<link from="-1" to="2"><rargname>RSTR</rargname><post>H</post></link>
</dmrs>"#,
        )
        .unwrap();
        let dot = to_dot(&doc);
        assert!(dot.starts_with("digraph g {\n"));
        assert!(dot.contains("NodeTop [label=\"top\",style=bold];"));
        assert!(dot.contains("NodeM1 [label=<_the_q<BR /><FONT POINT-SIZE=\"10\"></FONT>>];"));
        assert!(dot.contains("Node2 [label=<named(\"Kim\")<BR />"));
        assert!(dot.contains("[x num=sg]"));
        assert!(dot.contains("NodeTop -> Node2 [style=dotted];"));
        assert!(dot.contains("NodeM1 -> Node2 [label=\"RSTR/H\"];"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn escapes_markup_inside_html_labels() {
        let doc = parse_dmrs(
            r#"<dmrs>
<node nodeid="1" carg="A&amp;B&lt;C"><gpred>named_rel</gpred><sortinfo cvarsort="x" note="&lt;x&gt;"/></node>
</dmrs>"#,
        )
        .unwrap();
        let dot = to_dot(&doc);
        assert!(dot.contains("named(\"A&amp;B&lt;C\")"));
        assert!(dot.contains("[x note=&lt;x&gt;]"));
        assert!(!dot.contains("A&B"));
        assert!(!dot.contains("NodeTop"));
    }
}
