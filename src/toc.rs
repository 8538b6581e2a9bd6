//! Sidebar table of contents rendering.
//!
//! Turns the flat, ordered heading sequence into nested `<ul>`/`<li>` markup
//! styled with the design system's side menu classes:
//!
//! ```text
//! [("toc_1", "Intro", 1), ("toc_2", "Install", 2), ("toc_3", "License", 1)]
//!
//! <ul class="fr-sidemenu__list">
//! <li class="fr-sidemenu__item"><a href="#toc_1" …>Intro</a>
//! <ul class="fr-sidemenu__list">
//! <li class="fr-sidemenu__item"><a href="#toc_2" …>Install</a></li>
//! </ul>
//! </li>
//! <li class="fr-sidemenu__item"><a href="#toc_3" …>License</a></li>
//! </ul>
//! ```
//!
//! ## Level Stack
//!
//! Nesting is tracked with an explicit stack of open levels rather than by
//! building a tree first. Descending any number of levels opens exactly one
//! nested list. Ascending pops until a level equal to or shallower than the
//! target is found, closing one item+list pair per pop.
//!
//! ## Unmatched Ascent
//!
//! When the stack runs out before a level `<=` the target is found (the
//! document started deeper than it later returns to, e.g. levels `[3, 1]` or
//! `[2, 3, 1]`), the heading becomes a sibling at the outermost depth that
//! is still open. Nothing is re-wrapped and no empty list is synthesized, so
//! `[3, 1]` renders as a flat two-item list.

use crate::types::Heading;
use maud::html;

const LIST_OPEN: &str = "<ul class=\"fr-sidemenu__list\">\n";
const ITEM_OPEN: &str = "<li class=\"fr-sidemenu__item\">";
const ITEM_CLOSE: &str = "</li>\n";
const LIST_CLOSE: &str = "</ul>\n";

/// Render the anchor for one heading. Id and text are escaped by maud.
fn item_link(heading: &Heading) -> String {
    html! {
        a href={ "#" (heading.id) } class="fr-sidemenu__link" target="_self" { (heading.text) }
    }
    .into_string()
}

/// Render headings as nested side menu lists.
///
/// Returns an empty string for an empty slice. The output is always
/// balanced: every `<ul>` and `<li>` opened is closed.
pub fn render_toc_ul(headings: &[Heading]) -> String {
    let Some((first, rest)) = headings.split_first() else {
        return String::new();
    };

    let mut out = String::new();
    let mut levels: Vec<u8> = Vec::new();

    out.push_str(LIST_OPEN);
    out.push_str(ITEM_OPEN);
    out.push_str(&item_link(first));
    levels.push(first.level);

    for heading in rest {
        let level = heading.level;
        let link = item_link(heading);
        // The stack is never empty here: every branch below pushes.
        let top = levels.last().copied().unwrap_or(level);

        if level == top {
            open_sibling(&mut out, &link);
        } else if level > top {
            out.push('\n');
            out.push_str(LIST_OPEN);
            out.push_str(ITEM_OPEN);
            out.push_str(&link);
            levels.push(level);
        } else {
            ascend(&mut out, &mut levels, level, &link);
        }
    }

    while levels.len() > 1 {
        out.push_str(ITEM_CLOSE);
        out.push_str(LIST_CLOSE);
        levels.pop();
    }
    out.push_str(ITEM_CLOSE);
    out.push_str(LIST_CLOSE);
    out
}

/// Close the current item and open a new one in the same list.
fn open_sibling(out: &mut String, link: &str) {
    out.push_str(ITEM_CLOSE);
    out.push_str(ITEM_OPEN);
    out.push_str(link);
}

/// Walk back up the level stack until `level` finds its place.
fn ascend(out: &mut String, levels: &mut Vec<u8>, level: u8, link: &str) {
    // The current (deepest) level is closed by whichever branch stops the walk.
    levels.pop();

    while let Some(popped) = levels.pop() {
        if popped == level {
            out.push_str(ITEM_CLOSE);
            out.push_str(LIST_CLOSE);
            open_sibling(out, link);
            levels.push(level);
            return;
        }
        if popped < level {
            open_sibling(out, link);
            levels.push(popped);
            levels.push(level);
            return;
        }
        out.push_str(ITEM_CLOSE);
        out.push_str(LIST_CLOSE);
    }

    levels.push(level);
    open_sibling(out, link);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prettify::check_well_formed;
    use crate::test_helpers::*;

    #[test]
    fn empty_headings_render_nothing() {
        assert_eq!(render_toc_ul(&[]), "");
    }

    #[test]
    fn single_heading_is_one_flat_item() {
        let html = render_toc_ul(&[heading("toc_1", "Intro", 1)]);
        assert_eq!(
            html,
            "<ul class=\"fr-sidemenu__list\">\n\
             <li class=\"fr-sidemenu__item\">\
             <a href=\"#toc_1\" class=\"fr-sidemenu__link\" target=\"_self\">Intro</a></li>\n\
             </ul>\n"
        );
        assert_eq!(count_tags(&html, "<ul"), 1);
        assert_eq!(count_tags(&html, "<li"), 1);
    }

    #[test]
    fn same_level_headings_form_a_flat_list() {
        let html = render_toc_ul(&headings_at(&[2, 2, 2]));
        assert_eq!(count_tags(&html, "<ul"), 1);
        assert_eq!(count_tags(&html, "<li"), 3);
        assert!(check_well_formed(&html).is_ok());
    }

    #[test]
    fn child_list_nests_inside_first_item() {
        let html = render_toc_ul(&headings_at(&[1, 2, 2, 1]));
        assert_eq!(
            html,
            "<ul class=\"fr-sidemenu__list\">\n\
             <li class=\"fr-sidemenu__item\"><a href=\"#toc_1\" class=\"fr-sidemenu__link\" target=\"_self\">Heading 1</a>\n\
             <ul class=\"fr-sidemenu__list\">\n\
             <li class=\"fr-sidemenu__item\"><a href=\"#toc_2\" class=\"fr-sidemenu__link\" target=\"_self\">Heading 2</a></li>\n\
             <li class=\"fr-sidemenu__item\"><a href=\"#toc_3\" class=\"fr-sidemenu__link\" target=\"_self\">Heading 3</a></li>\n\
             </ul>\n\
             </li>\n\
             <li class=\"fr-sidemenu__item\"><a href=\"#toc_4\" class=\"fr-sidemenu__link\" target=\"_self\">Heading 4</a></li>\n\
             </ul>\n"
        );
        assert_eq!(count_tags(&html, "<ul"), 2);
        assert!(check_well_formed(&html).is_ok());
    }

    #[test]
    fn three_level_drop_closes_everything_before_next_item() {
        let html = render_toc_ul(&headings_at(&[1, 2, 3, 1]));
        let before_last = html
            .split("href=\"#toc_4\"")
            .next()
            .expect("last item present");
        // Both nested lists are closed before the second top-level item opens.
        assert_eq!(count_tags(before_last, "<ul"), 3);
        assert_eq!(count_tags(before_last, "</ul>"), 2);
        assert!(check_well_formed(&html).is_ok());
    }

    #[test]
    fn four_to_one_drop_without_intermediate_levels() {
        let html = render_toc_ul(&headings_at(&[1, 4, 1]));
        assert_eq!(count_tags(&html, "<ul"), 2);
        assert_eq!(count_tags(&html, "<li"), 3);
        assert!(check_well_formed(&html).is_ok());
    }

    #[test]
    fn ascent_with_no_matching_level_is_flat() {
        let html = render_toc_ul(&headings_at(&[3, 1]));
        assert_eq!(
            html,
            "<ul class=\"fr-sidemenu__list\">\n\
             <li class=\"fr-sidemenu__item\"><a href=\"#toc_1\" class=\"fr-sidemenu__link\" target=\"_self\">Heading 1</a></li>\n\
             <li class=\"fr-sidemenu__item\"><a href=\"#toc_2\" class=\"fr-sidemenu__link\" target=\"_self\">Heading 2</a></li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn ascent_past_the_first_level_reopens_at_outer_list() {
        // 2 → 3 → 1: the level-3 list closes, then the heading becomes a sibling
        // of the level-2 item in the outer list.
        let html = render_toc_ul(&headings_at(&[2, 3, 1]));
        assert_eq!(count_tags(&html, "<ul"), 2);
        assert_eq!(count_tags(&html, "</ul>"), 2);
        assert!(html.ends_with(
            "<a href=\"#toc_3\" class=\"fr-sidemenu__link\" target=\"_self\">Heading 3</a></li>\n</ul>\n"
        ));
        assert!(check_well_formed(&html).is_ok());
    }

    #[test]
    fn ascent_to_a_level_between_open_levels() {
        // 1 → 3 → 2: level 2 was never opened, so it replaces 3 in the nested list.
        let html = render_toc_ul(&headings_at(&[1, 3, 2, 3]));
        assert_eq!(count_tags(&html, "<ul"), 3);
        assert!(check_well_formed(&html).is_ok());
    }

    #[test]
    fn deep_descent_opens_one_list_per_heading() {
        let html = render_toc_ul(&headings_at(&[1, 6]));
        assert_eq!(count_tags(&html, "<ul"), 2);
    }

    #[test]
    fn link_text_is_escaped() {
        let html = render_toc_ul(&[heading("toc_1", "Q&A <draft>", 1)]);
        assert!(html.contains("Q&amp;A &lt;draft&gt;"));
    }

    #[test]
    fn irregular_sequences_stay_well_formed() {
        let sequences: &[&[u8]] = &[
            &[1, 2, 3, 4, 5, 6, 1],
            &[6, 5, 4, 3, 2, 1],
            &[2, 1, 2, 1],
            &[1, 3, 1, 3, 2, 1],
            &[4, 2, 3, 1, 4],
        ];
        for levels in sequences {
            let html = render_toc_ul(&headings_at(levels));
            assert!(
                check_well_formed(&html).is_ok(),
                "unbalanced output for {levels:?}:\n{html}"
            );
            assert_eq!(count_tags(&html, "<li"), levels.len());
        }
    }
}
