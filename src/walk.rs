//! Navigation linearization.
//!
//! Flattens the navigation tree into document order, synthesizing divider
//! slots for chapter and section titles. Opted-out pages, external links,
//! and url-less pages contribute nothing; sections without children are
//! never emitted.

use log::debug;

use crate::assemble::ArticleStyle;
use crate::markup;
use crate::nav::NavNode;

/// One position in the final document: either a synthetic divider or a
/// reference to a real content page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Divider {
        id: String,
        title: String,
        style: ArticleStyle,
    },
    Content {
        url: String,
    },
}

/// Sequential identifier source for divider slots.
///
/// Divider ids live in their own `divider-{n}` space so they can never
/// collide with url-derived content ids.
#[derive(Debug, Default)]
struct DividerIds {
    next: usize,
}

impl DividerIds {
    fn next(&mut self) -> String {
        let id = format!("divider-{}", self.next);
        self.next += 1;
        id
    }
}

/// Linearize a navigation tree into an ordered slot sequence.
///
/// Depth-first, pre-order. Top-level pages receive a divider slot followed
/// by their content slot; nested pages only the content slot (their own
/// headings divide the enclosing chapter). Sections with children receive a
/// divider followed by their flattened descendants. When the root sequence
/// holds exactly one node, its divider is styled standalone.
pub fn linearize(nav: &[NavNode]) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut ids = DividerIds::default();
    let standalone = nav.len() == 1;

    for node in nav {
        visit(node, true, standalone, &mut ids, &mut slots);
    }

    slots
}

fn visit(
    node: &NavNode,
    top_level: bool,
    standalone: bool,
    ids: &mut DividerIds,
    slots: &mut Vec<Slot>,
) {
    if node.opted_out() {
        debug!("skipping opted-out page: {}", node.title);
        return;
    }
    if node.is_external || node.url.as_deref().is_some_and(markup::is_external) {
        debug!("skipping external link: {}", node.title);
        return;
    }

    if node.is_page {
        let Some(url) = &node.url else {
            debug!("skipping page without url: {}", node.title);
            return;
        };
        if top_level {
            // An unrenderable title drops the divider, not the page.
            match divider_title(&node.title) {
                Some(title) => slots.push(Slot::Divider {
                    id: ids.next(),
                    title,
                    style: if standalone {
                        ArticleStyle::Standalone
                    } else {
                        ArticleStyle::Chapter
                    },
                }),
                None => debug!("dropping divider with unrenderable title"),
            }
        }
        slots.push(Slot::Content { url: url.clone() });
    } else if !node.children.is_empty() {
        match divider_title(&node.title) {
            Some(title) => slots.push(Slot::Divider {
                id: ids.next(),
                title,
                style: ArticleStyle::Chapter,
            }),
            None => debug!("dropping divider with unrenderable title"),
        }
        for child in &node.children {
            visit(child, false, false, ids, slots);
        }
    }
}

/// Normalize a nav title into divider text; `None` when nothing renderable
/// remains.
fn divider_title(title: &str) -> Option<String> {
    let text = markup::normalize_text(title);
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::NavNode;
    use proptest::prelude::*;

    fn content_urls(slots: &[Slot]) -> Vec<String> {
        slots
            .iter()
            .filter_map(|s| match s {
                Slot::Content { url } => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn top_level_page_gets_divider_then_content() {
        let nav = vec![
            NavNode::page("A", "a/"),
            NavNode::section("B", vec![NavNode::page("B1", "b1/"), NavNode::page("B2", "b2/")]),
        ];
        let slots = linearize(&nav);

        assert_eq!(slots.len(), 5);
        assert!(matches!(&slots[0], Slot::Divider { title, .. } if title == "A"));
        assert!(matches!(&slots[1], Slot::Content { url } if url == "a/"));
        assert!(matches!(&slots[2], Slot::Divider { title, .. } if title == "B"));
        assert!(matches!(&slots[3], Slot::Content { url } if url == "b1/"));
        assert!(matches!(&slots[4], Slot::Content { url } if url == "b2/"));
    }

    #[test]
    fn single_root_is_standalone() {
        let slots = linearize(&[NavNode::page("Only", "only/")]);
        assert!(
            matches!(&slots[0], Slot::Divider { style, .. } if *style == ArticleStyle::Standalone)
        );

        let slots = linearize(&[NavNode::page("A", "a/"), NavNode::page("B", "b/")]);
        assert!(matches!(&slots[0], Slot::Divider { style, .. } if *style == ArticleStyle::Chapter));
    }

    #[test]
    fn nested_page_has_no_divider() {
        let nav = vec![NavNode::section("S", vec![NavNode::page("P", "p/")])];
        let slots = linearize(&nav);
        assert_eq!(slots.len(), 2);
        assert!(matches!(&slots[0], Slot::Divider { title, .. } if title == "S"));
        assert!(matches!(&slots[1], Slot::Content { url } if url == "p/"));
    }

    #[test]
    fn opted_out_page_contributes_nothing() {
        let nav = vec![
            NavNode::page("A", "a/").exclude_from_print(),
            NavNode::page("B", "b/"),
        ];
        let slots = linearize(&nav);
        assert_eq!(content_urls(&slots), vec!["b/"]);
        // No divider for the excluded page either.
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn external_links_are_excluded() {
        let nav = vec![
            NavNode::external("GitHub", "https://github.com/example"),
            NavNode::page("A", "a/"),
        ];
        let slots = linearize(&nav);
        assert_eq!(content_urls(&slots), vec!["a/"]);
    }

    #[test]
    fn page_without_url_is_excluded() {
        let mut node = NavNode::page("Broken", "x/");
        node.url = None;
        let slots = linearize(&[node]);
        assert!(slots.is_empty());
    }

    #[test]
    fn empty_section_is_never_emitted() {
        let slots = linearize(&[NavNode::section("Empty", vec![])]);
        assert!(slots.is_empty());
    }

    #[test]
    fn unrenderable_title_drops_divider_keeps_content() {
        let nav = vec![NavNode::page("   ", "a/"), NavNode::page("B", "b/")];
        let slots = linearize(&nav);
        // Divider for the blank title is skipped; content survives.
        assert!(matches!(&slots[0], Slot::Content { url } if url == "a/"));
        assert!(matches!(&slots[1], Slot::Divider { title, .. } if title == "B"));
    }

    #[test]
    fn unrenderable_section_title_keeps_children() {
        let nav = vec![NavNode::section("  ", vec![NavNode::page("P", "p/")])];
        let slots = linearize(&nav);
        assert_eq!(content_urls(&slots), vec!["p/"]);
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn divider_ids_are_sequential_and_distinct() {
        let nav = vec![NavNode::page("A", "a/"), NavNode::page("B", "b/")];
        let slots = linearize(&nav);
        let ids: Vec<_> = slots
            .iter()
            .filter_map(|s| match s {
                Slot::Divider { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["divider-0", "divider-1"]);
    }

    // Build a two-level nav from a generated shape and return it with the
    // urls expected to appear, in pre-order.
    fn build_nav(shape: &[(bool, bool, usize)]) -> (Vec<NavNode>, Vec<String>) {
        let mut nav = Vec::new();
        let mut expected = Vec::new();
        for (i, &(is_section, included, child_count)) in shape.iter().enumerate() {
            if is_section && child_count > 0 {
                let mut children = Vec::new();
                for j in 0..child_count {
                    let url = format!("s{i}/c{j}/");
                    if included {
                        children.push(NavNode::page(format!("C{j}"), url.clone()));
                        expected.push(url);
                    } else if j % 2 == 0 {
                        children
                            .push(NavNode::page(format!("C{j}"), url).exclude_from_print());
                    } else {
                        children.push(NavNode::page(format!("C{j}"), url.clone()));
                        expected.push(url);
                    }
                }
                nav.push(NavNode::section(format!("S{i}"), children));
            } else {
                let url = format!("p{i}/");
                if included {
                    nav.push(NavNode::page(format!("P{i}"), url.clone()));
                    expected.push(url);
                } else {
                    nav.push(NavNode::page(format!("P{i}"), url).exclude_from_print());
                }
            }
        }
        (nav, expected)
    }

    proptest! {
        #[test]
        fn prop_content_slots_preserve_preorder(
            shape in prop::collection::vec((any::<bool>(), any::<bool>(), 0usize..4), 0..8)
        ) {
            let (nav, expected) = build_nav(&shape);
            let slots = linearize(&nav);
            prop_assert_eq!(content_urls(&slots), expected);
        }

        #[test]
        fn prop_opted_out_pages_never_appear(
            shape in prop::collection::vec((any::<bool>(), any::<bool>(), 0usize..4), 0..8)
        ) {
            let (nav, _) = build_nav(&shape);
            let mut excluded = Vec::new();
            fn collect_excluded(nodes: &[NavNode], out: &mut Vec<String>) {
                for n in nodes {
                    if n.opted_out()
                        && let Some(url) = &n.url
                    {
                        out.push(url.clone());
                    }
                    collect_excluded(&n.children, out);
                }
            }
            collect_excluded(&nav, &mut excluded);

            let urls = content_urls(&linearize(&nav));
            for url in excluded {
                prop_assert!(!urls.contains(&url));
            }
        }
    }
}
