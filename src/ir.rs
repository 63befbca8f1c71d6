use crate::error::DmrsError;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Node id used by the `from` end of the link that marks the graph's root.
pub const TOP_SENTINEL: i64 = 0;

static REAL_PRED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^_(?P<lemma>.+?)_(?P<pos>[nvajrpqxcus])(?:_(?P<sense>[^_]+))?$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pred {
    Real {
        lemma: String,
        pos: String,
        sense: Option<String>,
    },
    Grammar {
        name: String,
    },
}

impl Pred {
    pub fn real(lemma: &str, pos: &str, sense: Option<&str>) -> Self {
        Pred::Real {
            lemma: lemma.to_string(),
            pos: pos.to_string(),
            sense: sense.map(str::to_string),
        }
    }

    pub fn grammar(name: &str) -> Self {
        Pred::Grammar {
            name: name.to_string(),
        }
    }

    /// The full MRS relation name, with its `_rel` suffix.
    pub fn mrs_string(&self) -> String {
        format!("{self}_rel")
    }
}

impl fmt::Display for Pred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pred::Real {
                lemma,
                pos,
                sense: Some(sense),
            } => write!(f, "_{lemma}_{pos}_{sense}"),
            Pred::Real {
                lemma,
                pos,
                sense: None,
            } => write!(f, "_{lemma}_{pos}"),
            Pred::Grammar { name } => f.write_str(name),
        }
    }
}

impl FromStr for Pred {
    type Err = DmrsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim().trim_matches('"');
        let body = trimmed.strip_suffix("_rel").unwrap_or(trimmed);
        if body.is_empty() || body == "_" {
            return Err(DmrsError::InvalidPredicate(raw.to_string()));
        }
        if !body.starts_with('_') {
            return Ok(Pred::grammar(body));
        }

        if let Some(caps) = REAL_PRED_RE.captures(body) {
            return Ok(Pred::real(
                &caps["lemma"],
                &caps["pos"],
                caps.name("sense").map(|m| m.as_str()),
            ));
        }

        // Unknown part-of-speech tag: take the first two segments literally.
        let mut parts = body[1..].splitn(3, '_');
        let lemma = parts.next().unwrap_or_default();
        let Some(pos) = parts.next().filter(|pos| !pos.is_empty()) else {
            return Err(DmrsError::InvalidPredicate(raw.to_string()));
        };
        if lemma.is_empty() {
            return Err(DmrsError::InvalidPredicate(raw.to_string()));
        }
        Ok(Pred::real(lemma, pos, parts.next().filter(|s| !s.is_empty())))
    }
}

/// Grammatical properties in document attribute order.
pub type Properties = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub node_id: i64,
    pub pred: Pred,
    pub cfrom: Option<i64>,
    pub cto: Option<i64>,
    pub surface: Option<String>,
    pub base: Option<String>,
    pub carg: Option<String>,
    /// Semantic category (`x`, `e`, `i`, ...), from `sortinfo/@cvarsort`.
    pub cvarsort: Option<String>,
    pub properties: Properties,
}

impl NodeRecord {
    pub fn new(node_id: i64, pred: Pred) -> Self {
        Self {
            node_id,
            pred,
            cfrom: None,
            cto: None,
            surface: None,
            base: None,
            carg: None,
            cvarsort: None,
            properties: Properties::new(),
        }
    }

    /// Label shown inside the node box, e.g. `named(Kim)`.
    pub fn label(&self) -> String {
        match &self.carg {
            Some(carg) => format!("{}({carg})", self.pred),
            None => self.pred.to_string(),
        }
    }

    pub fn span(&self) -> Option<(i64, i64)> {
        Some((self.cfrom?, self.cto?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub from: i64,
    pub to: i64,
    pub rargname: String,
    pub post: String,
}

impl LinkRecord {
    pub fn new(from: i64, to: i64, rargname: &str, post: &str) -> Self {
        Self {
            from,
            to,
            rargname: rargname.to_string(),
            post: post.to_string(),
        }
    }

    pub fn is_top(&self) -> bool {
        self.from == TOP_SENTINEL
    }

    /// `ARG1/NEQ`, or just the post for a bare equality.
    pub fn label(&self) -> String {
        if self.rargname.is_empty() {
            self.post.clone()
        } else {
            format!("{}/{}", self.rargname, self.post)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub cfrom: Option<i64>,
    pub cto: Option<i64>,
    pub surface: Option<String>,
    pub ident: Option<i64>,
    pub index: Option<i64>,
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

impl Document {
    pub fn node(&self, node_id: i64) -> Option<&NodeRecord> {
        self.nodes.iter().find(|node| node.node_id == node_id)
    }

    /// Target of the TOP link, if the document has one.
    pub fn top(&self) -> Option<i64> {
        self.links.iter().find(|link| link.is_top()).map(|link| link.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_real_predicates() {
        assert_eq!(
            "_dog_n_1_rel".parse::<Pred>().unwrap(),
            Pred::real("dog", "n", Some("1"))
        );
        assert_eq!("_the_q_rel".parse::<Pred>().unwrap(), Pred::real("the", "q", None));
        assert_eq!(
            "_look_v_up".parse::<Pred>().unwrap(),
            Pred::real("look", "v", Some("up"))
        );
        assert_eq!(
            "_in+front+of_p_rel".parse::<Pred>().unwrap(),
            Pred::real("in+front+of", "p", None)
        );
    }

    #[test]
    fn parses_grammar_predicates() {
        let pred: Pred = "udef_q_rel".parse().unwrap();
        assert_eq!(pred, Pred::grammar("udef_q"));
        assert_eq!(pred.mrs_string(), "udef_q_rel");
        assert!("_rel".parse::<Pred>().is_err());
        assert!("".parse::<Pred>().is_err());
    }

    #[test]
    fn display_drops_rel_suffix() {
        assert_eq!(Pred::real("chase", "v", Some("1")).to_string(), "_chase_v_1");
        assert_eq!(Pred::grammar("pron").to_string(), "pron");
    }

    #[test]
    fn node_label_includes_carg() {
        let mut node = NodeRecord::new(10, Pred::grammar("named"));
        node.carg = Some("Kim".to_string());
        assert_eq!(node.label(), "named(Kim)");
    }

    #[test]
    fn link_label_for_bare_equality() {
        assert_eq!(LinkRecord::new(1, 2, "", "EQ").label(), "EQ");
        assert_eq!(LinkRecord::new(1, 2, "ARG1", "NEQ").label(), "ARG1/NEQ");
    }
}
