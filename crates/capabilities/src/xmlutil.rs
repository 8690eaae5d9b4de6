//! Namespace-agnostic accessors over a roxmltree DOM.
//!
//! Capability documents arrive with every imaginable prefix arrangement,
//! so all matching here is on local names only.

use std::borrow::Cow;

use roxmltree::Node;

/// Strip control characters a strict XML parser rejects. Some servers
/// ship capability documents with embedded form feeds; roxmltree refuses
/// to parse those, so they have to go before parsing. XML whitespace
/// (tab, newline, carriage return) stays.
pub fn sanitize(xml: &str) -> Cow<'_, str> {
    let dirty = |c: char| c.is_control() && !matches!(c, '\t' | '\n' | '\r');
    if xml.contains(dirty) {
        Cow::Owned(xml.chars().filter(|c| !dirty(*c)).collect())
    } else {
        Cow::Borrowed(xml)
    }
}

/// Element children of `node` with the given local name.
pub fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// First element child with the given local name.
pub fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &'a str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

/// First descendant element with the given local name.
pub fn descendant<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Trimmed text content of the element, `None` when empty.
pub fn text(node: Node) -> Option<String> {
    let text = node.text()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Trimmed text of the first child element with the given local name
/// that carries any. Empty elements with the same name are skipped.
pub fn child_text(node: Node, name: &str) -> Option<String> {
    children(node, name).find_map(text)
}

/// Attribute value matched on the local attribute name.
pub fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

/// Attribute parsed as a float, matched on the local name.
pub fn attr_f64(node: Node, name: &str) -> Option<f64> {
    attr(node, name)?.trim().parse().ok()
}

/// Text content flattened to a single line: any remaining control
/// characters (including the whitespace `sanitize` keeps) are dropped.
/// Used for Fees/AccessConstraints, which some servers wrap oddly.
pub fn clean_text(node: Node) -> Option<String> {
    let cleaned: String = node.text()?.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<a xmlns:x="urn:x"><x:b minx="-1.5" name="first"/><b>two</b><c><d>deep</d></c></a>"#;

    #[test]
    fn test_local_name_matching_ignores_prefixes() {
        let doc = roxmltree::Document::parse(DOC).unwrap();
        let root = doc.root_element();
        assert_eq!(children(root, "b").count(), 2);
        assert_eq!(child_text(root, "b").as_deref(), Some("two"));
        assert_eq!(descendant(root, "d").and_then(text).as_deref(), Some("deep"));
    }

    #[test]
    fn test_attributes() {
        let doc = roxmltree::Document::parse(DOC).unwrap();
        let b = child(doc.root_element(), "b").unwrap();
        assert_eq!(attr(b, "name"), Some("first"));
        assert_eq!(attr_f64(b, "minx"), Some(-1.5));
        assert_eq!(attr(b, "absent"), None);
    }

    #[test]
    fn test_sanitize_allows_form_feeds_through_the_parser() {
        // Unsanitized, roxmltree rejects the form feed outright.
        let raw = "<a>none\u{0c} applicable\u{7f}</a>";
        assert!(roxmltree::Document::parse(raw).is_err());

        let cleaned = sanitize(raw);
        let doc = roxmltree::Document::parse(&cleaned).unwrap();
        assert_eq!(
            clean_text(doc.root_element()).as_deref(),
            Some("none applicable")
        );
    }

    #[test]
    fn test_sanitize_borrows_clean_input() {
        let clean = "<a>\n  <b>two</b>\n</a>";
        assert!(matches!(sanitize(clean), Cow::Borrowed(_)));
    }
}
