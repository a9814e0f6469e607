//! Document assembly: pulling the title out of the root `head` element.

use super::node::Node;
use log::warn;

/// Root-level metadata container.
pub const HEAD_TAG: &str = "head";
/// Child of the metadata container holding the document title.
pub const TITLE_TAG: &str = "title";

/// A rewritten document split into its title and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    /// Content of the `title` element, if the document has one
    pub title: Option<Vec<Node>>,
    /// Everything else, in document order
    pub body: Vec<Node>,
}

/// Split a rewritten tree into title and body.
///
/// The first root-level `head` is removed from the body and the content of
/// its first `title` child becomes the title. A `head` without a `title` is
/// still removed. Any later `head` elements stay in the body.
pub fn assemble(mut nodes: Vec<Node>) -> Assembled {
    let Some(index) = nodes.iter().position(|node| node.tag() == Some(HEAD_TAG)) else {
        return Assembled {
            title: None,
            body: nodes,
        };
    };

    let head = nodes.remove(index);

    if nodes.iter().any(|node| node.tag() == Some(HEAD_TAG)) {
        warn!("Document has more than one <head>; only the first is used");
    }

    let title = head.into_element().and_then(|head| {
        head.children
            .into_iter()
            .filter_map(Node::into_element)
            .find(|child| child.tag == TITLE_TAG)
            .map(|title| title.children)
    });

    Assembled { title, body: nodes }
}
