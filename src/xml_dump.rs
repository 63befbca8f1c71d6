use crate::ir::{Document, LinkRecord, NodeRecord, Pred};
use crate::render::escape_xml;
use std::fmt::Write as _;

/// Serializes a document back to `<dmrs>` XML in the form `parse_dmrs` reads.
/// Nodes and links keep their document order; `carg` is written quoted.
pub fn dump_dmrs(doc: &Document) -> String {
    let mut out = String::from("<dmrs");
    push_int_attr(&mut out, "cfrom", doc.cfrom);
    push_int_attr(&mut out, "cto", doc.cto);
    push_str_attr(&mut out, "surface", doc.surface.as_deref());
    push_int_attr(&mut out, "ident", doc.ident);
    push_int_attr(&mut out, "index", doc.index);
    out.push_str(">\n");
    for node in &doc.nodes {
        push_node(&mut out, node);
    }
    for link in &doc.links {
        push_link(&mut out, link);
    }
    out.push_str("</dmrs>\n");
    out
}

fn push_node(out: &mut String, node: &NodeRecord) {
    let _ = write!(out, "<node nodeid=\"{}\"", node.node_id);
    push_int_attr(out, "cfrom", node.cfrom);
    push_int_attr(out, "cto", node.cto);
    push_str_attr(out, "surface", node.surface.as_deref());
    push_str_attr(out, "base", node.base.as_deref());
    if let Some(carg) = &node.carg {
        let _ = write!(out, " carg=\"{}\"", escape_xml(&format!("\"{carg}\"")));
    }
    out.push('>');

    match &node.pred {
        Pred::Real { lemma, pos, sense } => {
            let _ = write!(
                out,
                "<realpred lemma=\"{}\" pos=\"{}\"",
                escape_xml(lemma),
                escape_xml(pos)
            );
            push_str_attr(out, "sense", sense.as_deref());
            out.push_str("/>");
        }
        Pred::Grammar { .. } => {
            let _ = write!(out, "<gpred>{}</gpred>", escape_xml(&node.pred.mrs_string()));
        }
    }

    out.push_str("<sortinfo");
    push_str_attr(out, "cvarsort", node.cvarsort.as_deref());
    for (name, value) in &node.properties {
        let _ = write!(out, " {name}=\"{}\"", escape_xml(value));
    }
    out.push_str("/></node>\n");
}

fn push_link(out: &mut String, link: &LinkRecord) {
    let _ = write!(out, "<link from=\"{}\" to=\"{}\">", link.from, link.to);
    if link.rargname.is_empty() {
        out.push_str("<rargname/>");
    } else {
        let _ = write!(out, "<rargname>{}</rargname>", escape_xml(&link.rargname));
    }
    let _ = writeln!(out, "<post>{}</post></link>", escape_xml(&link.post));
}

fn push_int_attr(out: &mut String, name: &str, value: Option<i64>) {
    if let Some(value) = value {
        let _ = write!(out, " {name}=\"{value}\"");
    }
}

fn push_str_attr(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = write!(out, " {name}=\"{}\"", escape_xml(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_dmrs;

    const MIXED: &str = r#"<dmrs cfrom="0" cto="17" surface="Kim &amp; Lee slept." index="3">
<node nodeid="-1" cfrom="0" cto="3" carg="&quot;Kim&quot;"><gpred>named_rel</gpred><sortinfo cvarsort="x" pers="3" num="sg" pt="std"/></node>
<node nodeid="2" cfrom="4" cto="5" base="&amp;"><realpred lemma="and" pos="c"/><sortinfo cvarsort="x"/></node>
<node nodeid="3" cfrom="10" cto="17" surface="slept."><realpred lemma="sleep" pos="v" sense="1"/><sortinfo cvarsort="e" tense="past"/></node>
<node nodeid="4"><gpred>udef_q_rel</gpred><sortinfo/></node>
<link from="0" to="3"><rargname/><post>H</post></link>
<link from="2" to="-1"><rargname>L-INDEX</rargname><post>NEQ</post></link>
<link from="3" to="2"><rargname>ARG1</rargname><post>NEQ</post></link>
<link from="4" to="2"><rargname>RSTR</rargname><post>H</post></link>
<link from="3" to="3"><rargname/><post>EQ</post></link>
</dmrs>"#;

    #[test]
    fn reparsing_a_dump_gives_the_same_document() {
        let doc = parse_dmrs(MIXED).unwrap();
        let dumped = dump_dmrs(&doc);
        assert_eq!(parse_dmrs(&dumped).unwrap(), doc);
        assert_eq!(dump_dmrs(&parse_dmrs(&dumped).unwrap()), dumped);
    }

    #[test]
    fn writes_parser_element_forms() {
        let dumped = dump_dmrs(&parse_dmrs(MIXED).unwrap());
        assert!(dumped.starts_with(
            "<dmrs cfrom=\"0\" cto=\"17\" surface=\"Kim &amp; Lee slept.\" index=\"3\">\n"
        ));
        assert!(dumped.contains("carg=\"&quot;Kim&quot;\""));
        assert!(dumped.contains("<gpred>named_rel</gpred>"));
        assert!(dumped.contains("<realpred lemma=\"sleep\" pos=\"v\" sense=\"1\"/>"));
        assert!(dumped.contains("<sortinfo cvarsort=\"x\" pers=\"3\" num=\"sg\" pt=\"std\"/>"));
        assert!(dumped.contains("<link from=\"0\" to=\"3\"><rargname/><post>H</post></link>"));
        assert!(dumped.ends_with("</dmrs>\n"));
    }

    #[test]
    fn empty_document_is_a_bare_root() {
        assert_eq!(dump_dmrs(&Document::default()), "<dmrs>\n</dmrs>\n");
    }
}
