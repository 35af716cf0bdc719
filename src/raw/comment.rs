//! A standalone comment line kept as an `Object` field. The resolver never
//! sees these; they exist so a future formatting/rewriting mode can
//! reproduce a document's comments verbatim.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentKind {
    Hash,
    DoubleSlash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
}

impl Comment {
    pub fn new(kind: CommentKind, text: impl Into<String>) -> Self {
        Comment {
            kind,
            text: text.into(),
        }
    }
}
