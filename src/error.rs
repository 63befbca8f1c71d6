pub type Result<T> = std::result::Result<T, DmrsError>;

#[derive(Debug, thiserror::Error)]
pub enum DmrsError {
    #[error("malformed DMRS XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected a <dmrs> root element, found <{tag}>")]
    UnexpectedRoot { tag: String },

    #[error("unexpected element <{tag}> inside <dmrs>")]
    UnexpectedElement { tag: String },

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<{element}> attribute `{attribute}` has invalid value {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("node {node_id} has no <realpred> or <gpred>")]
    MissingPredicate { node_id: i64 },

    #[error("invalid predicate {0:?}")]
    InvalidPredicate(String),

    #[error("duplicate node id {node_id}")]
    DuplicateNode { node_id: i64 },

    #[error("link {from} -> {to} references unknown node {missing}")]
    MissingReference { from: i64, to: i64, missing: i64 },
}

impl DmrsError {
    /// True for failures that mean the input text itself could not be read
    /// as a DMRS document, as opposed to a well-formed document whose
    /// contents are inconsistent.
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, DmrsError::MissingReference { .. })
    }
}
