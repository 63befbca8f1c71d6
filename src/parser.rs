use crate::error::{DmrsError, Result};
use crate::ir::{Document, LinkRecord, NodeRecord, Pred, Properties};
use roxmltree::Node;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Rename the legacy `prontype` sortinfo property to `pt`.
    pub convert_legacy_prontype: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            convert_legacy_prontype: true,
        }
    }
}

pub fn parse_dmrs(input: &str) -> Result<Document> {
    parse_dmrs_with_options(input, ParseOptions::default())
}

pub fn parse_dmrs_with_options(input: &str, options: ParseOptions) -> Result<Document> {
    let xml = roxmltree::Document::parse(input)?;
    let root = xml.root_element();
    if root.tag_name().name() != "dmrs" {
        return Err(DmrsError::UnexpectedRoot {
            tag: root.tag_name().name().to_string(),
        });
    }

    let mut doc = Document {
        cfrom: int_attr(root, "dmrs", "cfrom")?,
        cto: int_attr(root, "dmrs", "cto")?,
        surface: root.attribute("surface").map(str::to_string),
        ident: int_attr(root, "dmrs", "ident")?,
        index: int_attr(root, "dmrs", "index")?,
        ..Document::default()
    };

    let mut seen = HashSet::new();
    for elem in root.children().filter(Node::is_element) {
        match elem.tag_name().name() {
            "node" => {
                let node = parse_node(elem, options)?;
                if !seen.insert(node.node_id) {
                    return Err(DmrsError::DuplicateNode {
                        node_id: node.node_id,
                    });
                }
                trace!(node_id = node.node_id, pred = %node.pred, "parsed node");
                doc.nodes.push(node);
            }
            "link" => {
                let link = parse_link(elem)?;
                trace!(from = link.from, to = link.to, label = %link.label(), "parsed link");
                doc.links.push(link);
            }
            other => {
                return Err(DmrsError::UnexpectedElement {
                    tag: other.to_string(),
                });
            }
        }
    }

    debug!(
        nodes = doc.nodes.len(),
        links = doc.links.len(),
        "parsed DMRS document"
    );
    Ok(doc)
}

fn parse_node(elem: Node<'_, '_>, options: ParseOptions) -> Result<NodeRecord> {
    let node_id = required_int_attr(elem, "node", "nodeid")?;
    let mut pred = None;
    let mut cvarsort = None;
    let mut properties = Properties::new();

    for child in elem.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "realpred" => {
                let lemma = child.attribute("lemma").ok_or(DmrsError::MissingAttribute {
                    element: "realpred",
                    attribute: "lemma",
                })?;
                let pos = child.attribute("pos").ok_or(DmrsError::MissingAttribute {
                    element: "realpred",
                    attribute: "pos",
                })?;
                pred = Some(Pred::real(lemma, pos, child.attribute("sense")));
            }
            "gpred" => {
                pred = Some(Pred::from_str(child.text().unwrap_or_default())?);
            }
            "sortinfo" => {
                for attr in child.attributes() {
                    let name = attr.name();
                    if name == "cvarsort" {
                        cvarsort = Some(attr.value().to_string());
                        continue;
                    }
                    let key = if options.convert_legacy_prontype && name == "prontype" {
                        "pt"
                    } else {
                        name
                    };
                    properties.insert(key.to_string(), attr.value().to_string());
                }
            }
            _ => {}
        }
    }

    let pred = pred.ok_or(DmrsError::MissingPredicate { node_id })?;
    Ok(NodeRecord {
        node_id,
        pred,
        cfrom: int_attr(elem, "node", "cfrom")?,
        cto: int_attr(elem, "node", "cto")?,
        surface: elem.attribute("surface").map(str::to_string),
        base: elem.attribute("base").map(str::to_string),
        carg: elem
            .attribute("carg")
            .map(|carg| carg.trim_matches('"').to_string()),
        cvarsort,
        properties,
    })
}

fn parse_link(elem: Node<'_, '_>) -> Result<LinkRecord> {
    let from = required_int_attr(elem, "link", "from")?;
    let to = required_int_attr(elem, "link", "to")?;
    let mut rargname = String::new();
    let mut post = String::new();
    for child in elem.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "rargname" => rargname = child.text().unwrap_or_default().trim().to_string(),
            "post" => post = child.text().unwrap_or_default().trim().to_string(),
            _ => {}
        }
    }
    Ok(LinkRecord {
        from,
        to,
        rargname,
        post,
    })
}

fn int_attr(elem: Node<'_, '_>, element: &'static str, attribute: &'static str) -> Result<Option<i64>> {
    let Some(raw) = elem.attribute(attribute) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| DmrsError::InvalidAttribute {
            element,
            attribute,
            value: raw.to_string(),
        })
}

fn required_int_attr(
    elem: Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<i64> {
    int_attr(elem, element, attribute)?.ok_or(DmrsError::MissingAttribute { element, attribute })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIM_SLEEPS: &str = r#"<dmrs cfrom="-1" cto="-1" surface="Kim sleeps." index="10002">
<node nodeid="10000" cfrom="0" cto="3"><gpred>proper_q_rel</gpred><sortinfo/></node>
<node nodeid="10001" cfrom="0" cto="3" carg="&quot;Kim&quot;"><gpred>named_rel</gpred><sortinfo cvarsort="x" pers="3" num="sg" prontype="std"/></node>
<node nodeid="10002" cfrom="4" cto="11"><realpred lemma="sleep" pos="v" sense="1"/><sortinfo cvarsort="e" tense="pres" mood="indicative"/></node>
<link from="0" to="10002"><rargname/><post>H</post></link>
<link from="10000" to="10001"><rargname>RSTR</rargname><post>H</post></link>
<link from="10002" to="10001"><rargname>ARG1</rargname><post>NEQ</post></link>
</dmrs>"#;

    #[test]
    fn parses_nodes_and_links() {
        let doc = parse_dmrs(KIM_SLEEPS).unwrap();
        assert_eq!(doc.surface.as_deref(), Some("Kim sleeps."));
        assert_eq!(doc.index, Some(10002));
        assert_eq!(doc.nodes.len(), 3);
        assert_eq!(doc.links.len(), 3);
        assert_eq!(doc.top(), Some(10002));

        let kim = doc.node(10001).unwrap();
        assert_eq!(kim.carg.as_deref(), Some("Kim"));
        assert_eq!(kim.cvarsort.as_deref(), Some("x"));
        assert_eq!(kim.label(), "named(Kim)");

        let sleep = doc.node(10002).unwrap();
        assert_eq!(sleep.pred, Pred::real("sleep", "v", Some("1")));
        assert_eq!(sleep.span(), Some((4, 11)));

        let top = &doc.links[0];
        assert!(top.is_top());
        assert_eq!(top.rargname, "");
        assert_eq!(top.post, "H");
    }

    #[test]
    fn keeps_property_order_and_converts_prontype() {
        let doc = parse_dmrs(KIM_SLEEPS).unwrap();
        let keys: Vec<&str> = doc.node(10001).unwrap().properties.keys().map(String::as_str).collect();
        assert_eq!(keys, ["pers", "num", "pt"]);

        let raw = parse_dmrs_with_options(
            KIM_SLEEPS,
            ParseOptions {
                convert_legacy_prontype: false,
            },
        )
        .unwrap();
        assert!(raw.node(10001).unwrap().properties.contains_key("prontype"));
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = parse_dmrs("<dmrs><node nodeid=\"1\">").unwrap_err();
        assert!(matches!(err, DmrsError::Xml(_)));
        assert!(err.is_parse_error());
    }

    #[test]
    fn rejects_unexpected_content() {
        assert!(matches!(
            parse_dmrs("<mrs/>").unwrap_err(),
            DmrsError::UnexpectedRoot { .. }
        ));
        assert!(matches!(
            parse_dmrs("<dmrs><ep/></dmrs>").unwrap_err(),
            DmrsError::UnexpectedElement { .. }
        ));
        assert!(matches!(
            parse_dmrs(r#"<dmrs><node nodeid="x"><gpred>a_rel</gpred></node></dmrs>"#).unwrap_err(),
            DmrsError::InvalidAttribute { .. }
        ));
        assert!(matches!(
            parse_dmrs(r#"<dmrs><node nodeid="1"><sortinfo/></node></dmrs>"#).unwrap_err(),
            DmrsError::MissingPredicate { node_id: 1 }
        ));
        assert!(matches!(
            parse_dmrs(
                r#"<dmrs><node nodeid="1"><gpred>a_rel</gpred></node><node nodeid="1"><gpred>b_rel</gpred></node></dmrs>"#
            )
            .unwrap_err(),
            DmrsError::DuplicateNode { node_id: 1 }
        ));
    }
}
