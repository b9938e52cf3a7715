mod common;

use common::*;
use erb_fmt::config::FormatOptions;
use insta::assert_snapshot;
use similar_asserts::assert_eq;

#[test]
fn void_element_is_self_closed() {
    let tree = root(vec![void_element("hr", vec![])]);
    assert_snapshot!(format(&tree), @"<hr />");
}

#[test]
fn attributes_break_one_per_line_when_too_long() {
    let tree = root(vec![void_element(
        "hr",
        vec![
            attr("id", "horizontal_rule_527"),
            attr("class", "w-48 border-black"),
            attr("data-controller", "horizontal-rule"),
        ],
    )]);
    assert_eq!(
        format(&tree),
        [
            "<hr",
            "  id=\"horizontal_rule_527\"",
            "  class=\"w-48 border-black\"",
            "  data-controller=\"horizontal-rule\"",
            "/>",
        ]
        .join("\n")
    );
}

#[test]
fn tag_and_known_attribute_names_are_lowercased() {
    let tree = root(vec![void_element(
        "HR",
        vec![attr("ID", "HR"), attr("CLASS", "HR"), attr("FOO", "BAR")],
    )]);
    assert_snapshot!(format(&tree), @r#"<hr id="HR" class="HR" FOO="BAR" />"#);
}

#[test]
fn unquoted_value_gains_double_quotes() {
    let tree = root(vec![void_element(
        "hr",
        vec![unquoted_attr("id", "horizontal_rule")],
    )]);
    assert_snapshot!(format(&tree), @r#"<hr id="horizontal_rule" />"#);
}

#[test]
fn quote_delimiter_minimizes_entity_escapes() {
    let tree = root(vec![void_element(
        "hr",
        vec![
            quoted_attr("foo", "'", "no_reason"),
            attr("bar", "&apos;&quot;"),
            attr("baz", "&apos;&quot;&quot;"),
        ],
    )]);
    assert_eq!(
        format(&tree),
        [
            "<hr",
            "  foo=\"no_reason\"",
            "  bar=\"'&quot;\"",
            "  baz='&apos;\"\"'",
            "/>",
        ]
        .join("\n")
    );
}

#[test]
fn single_quoted_literal_defaults_to_double_quotes() {
    let tree = root(vec![element(
        "div",
        vec![quoted_attr("class", "'", "foo")],
        vec![],
    )]);
    assert_snapshot!(format(&tree), @r#"<div class="foo"></div>"#);
}

#[test]
fn quote_selection_is_deterministic() {
    let cases = [
        ("it's", "<div class=\"it's\"></div>"),
        ("say \"hi\"", "<div class='say \"hi\"'></div>"),
        ("&QUOT;&#34;x", "<div class='\"\"x'></div>"),
        ("a\"b'c", "<div class=\"a&quot;b'c\"></div>"),
    ];
    for (value, expected) in cases {
        let tree = root(vec![element("div", vec![attr("class", value)], vec![])]);
        assert_eq!(format(&tree), expected);
    }
}

#[test]
fn long_text_wraps_between_words() {
    let tree = root(vec![element(
        "p",
        vec![],
        vec![text(
            "Lorem ipsum dolor sit amet, consecteur adipisci tempor incidunt ut labore et dolore",
        )],
    )]);
    assert_eq!(
        format(&tree),
        [
            "<p>",
            "  Lorem ipsum dolor sit amet, consecteur",
            "  adipisci tempor incidunt ut labore et",
            "  dolore",
            "</p>",
        ]
        .join("\n")
    );
}

#[test]
fn every_line_stays_within_the_width() {
    let tree = root(vec![element(
        "p",
        vec![],
        vec![text("one two three four five")],
    )]);
    let narrow = FormatOptions {
        print_width: 12,
        ..FormatOptions::default()
    };
    let output = erb_fmt::format_tree(&tree, &narrow);
    assert_eq!(output, "<p>\n  one two\n  three four\n  five\n</p>");
    assert!(output.lines().all(|line| line.len() <= 12));
}

#[test]
fn intentional_blank_lines_are_kept_but_capped() {
    let tree = root(vec![
        element("p", vec![], vec![text("One")]),
        text("\n"),
        element("p", vec![], vec![text("Two")]),
        text("\n\n\n"),
        element("p", vec![], vec![text("Three")]),
        text("\n"),
        element("p", vec![], vec![text("Four")]),
        text("\n"),
    ]);
    assert_eq!(
        format(&tree),
        [
            "<p>One</p>",
            "<p>Two</p>",
            "",
            "<p>Three</p>",
            "<p>Four</p>",
        ]
        .join("\n")
    );
}

#[test]
fn blank_lines_with_interior_whitespace_still_collapse() {
    let tree = root(vec![
        element("p", vec![], vec![text("One")]),
        text("\n   \n\n  "),
        element("p", vec![], vec![text("Two")]),
    ]);
    assert_eq!(format(&tree), "<p>One</p>\n\n<p>Two</p>");
}

#[test]
fn block_children_are_reindented_and_collapsed() {
    let tree = root(vec![
        text(" "),
        element(
            "div",
            vec![attr("class", "foo")],
            vec![
                text("\n\n\n"),
                element("p", vec![], vec![text("   Some  Text   ")]),
                text("\n"),
                element("p", vec![], vec![text("\n  Other  Text\n")]),
                text("\n\n"),
                element("p", vec![], vec![text("Yet Another Text\n")]),
                text("\n "),
            ],
        ),
        text("\n"),
    ]);
    assert_eq!(
        format(&tree),
        [
            "<div class=\"foo\">",
            "  <p>Some Text</p>",
            "  <p>Other Text</p>",
            "",
            "  <p>Yet Another Text</p>",
            "</div>",
        ]
        .join("\n")
    );
}

#[test]
fn comments_pass_through_verbatim() {
    let raw = "lorem ipsum dolor sit amet, consectetur adipiscing elit,\n    sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";
    let tree = root(vec![erb_fmt::ast::Node::Comment(erb_fmt::ast::Comment {
        raw,
    })]);
    assert_eq!(format(&tree), format!("<!--{raw}-->"));
}

#[test]
fn short_inline_tag_stays_flat() {
    let tree = root(vec![element("span", vec![], vec![text("Lorem ipsum")])]);
    assert_snapshot!(format(&tree), @"<span>Lorem ipsum</span>");
}

#[test]
fn long_inline_tag_breaks_inside_the_tags() {
    let tree = root(vec![element(
        "span",
        vec![attr("class", "foo")],
        vec![text("Lorem ipsum dolor sit amet")],
    )]);
    assert_eq!(
        format(&tree),
        "<span class=\"foo\"\n  >Lorem ipsum dolor sit amet</span\n>"
    );
}

#[test]
fn long_block_tag_indents_its_body() {
    let tree = root(vec![element(
        "p",
        vec![attr("class", "foo")],
        vec![text("Lorem ipsum dolor sit amet")],
    )]);
    assert_eq!(
        format(&tree),
        "<p class=\"foo\">\n  Lorem ipsum dolor sit amet\n</p>"
    );
}

#[test]
fn inline_run_breaks_at_the_whitespace_gap() {
    let tree = root(vec![
        element("b", vec![], vec![text("This is bold")]),
        text(" and "),
        element("i", vec![], vec![text("this is italic")]),
    ]);
    assert_eq!(
        format(&tree),
        "<b>This is bold</b> and\n<i>this is italic</i>"
    );
}

#[test]
fn br_forces_a_break_and_eats_following_whitespace() {
    let tree = root(vec![text("foo"), void_element("br", vec![]), text(" bar")]);
    assert_eq!(format(&tree), "foo<br />\nbar");
}

#[test]
fn pre_content_is_untouched() {
    let tree = root(vec![element(
        "pre",
        vec![],
        vec![text("\n  one\n    two\n")],
    )]);
    assert_eq!(format(&tree), "<pre>\n  one\n    two\n</pre>");
}

#[test]
fn erb_inside_attribute_value_keeps_original_quoting() {
    use erb_fmt::ast::{Attribute, AttributeValue, AttributeValueChild, NativeAttribute};
    let tree = root(vec![element(
        "div",
        vec![Attribute::Native(NativeAttribute {
            name: "class",
            value: Some(AttributeValue {
                quoted: true,
                open_quote: "\"",
                close_quote: "\"",
                children: vec![
                    AttributeValueChild::Erb(erb_tag("<%=", " classes ", "%>")),
                    AttributeValueChild::Literal(" m-4"),
                ],
            }),
        })],
        vec![],
    )]);
    assert_snapshot!(format(&tree), @r#"<div class="<%= classes %> m-4"></div>"#);
}

#[test]
fn erb_tag_in_attribute_position() {
    use erb_fmt::ast::Attribute;
    let tree = root(vec![element(
        "div",
        vec![Attribute::Erb(erb_tag("<%=", " attributes ", "%>"))],
        vec![],
    )]);
    assert_snapshot!(format(&tree), @"<div <%= attributes %>></div>");
}

#[test]
fn doctype_is_lowercased() {
    let tree = root(vec![
        erb_fmt::ast::Node::Doctype(erb_fmt::ast::Doctype {
            keyword: "<!DOCTYPE",
            value: " html",
        }),
        text("\n"),
        element("html", vec![], vec![]),
    ]);
    assert_eq!(format(&tree), "<!doctype html>\n<html></html>");
}
