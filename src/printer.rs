use crate::{
    ast::*,
    ctx::Ctx,
    doc::Doc,
    helpers::{self, AttributeLookup},
};

pub(crate) trait DocGen<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s>;
}

impl<'s> DocGen<'s> for Attribute<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        match self {
            Attribute::Erb(erb_tag) => erb_tag.doc(ctx),
            Attribute::Native(native_attribute) => native_attribute.doc(ctx),
        }
    }
}

impl<'s> DocGen<'s> for AttributeValue<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        if let [AttributeValueChild::Literal(value)] = self.children.as_slice() {
            // A single literal value is re-quoted with whichever delimiter
            // occurs less often in it, entity-encoding the delimiter inside
            // the value and decoding the other character back to its literal.
            let value = *value;
            let (quotes, apostrophes) = helpers::count_quote_forms(value);
            return if quotes > apostrophes {
                Doc::text("'")
                    .append(reflow_raw_owned(&helpers::rewrite_for_apostrophes(value)))
                    .append(Doc::text("'"))
            } else {
                Doc::text("\"")
                    .append(reflow_raw_owned(&helpers::rewrite_for_double_quotes(value)))
                    .append(Doc::text("\""))
            };
        }

        let mut docs = Vec::with_capacity(self.children.len() + 2);
        if self.quoted {
            docs.push(Doc::text(self.open_quote));
        }
        for child in &self.children {
            docs.push(match child {
                AttributeValueChild::Erb(erb_tag) => erb_tag.doc(ctx),
                AttributeValueChild::Literal(raw) => reflow_raw(raw),
            });
        }
        if self.quoted {
            docs.push(Doc::text(self.close_quote));
        }
        Doc::list(docs)
    }
}

impl<'s> DocGen<'s> for CloseTag<'s> {
    fn doc(&self, _: &mut Ctx<'_>) -> Doc<'s> {
        // The trailing `>` is emitted by the parent element so the breakable
        // before it participates in the element's own group.
        Doc::text("</").append(Doc::text(helpers::lowercased(self.tag_name)))
    }
}

impl<'s> DocGen<'s> for Comment<'s> {
    fn doc(&self, _: &mut Ctx<'_>) -> Doc<'s> {
        Doc::text("<!--")
            .append(reflow_raw(self.raw))
            .append(Doc::text("-->"))
    }
}

impl<'s> DocGen<'s> for Doctype<'s> {
    fn doc(&self, _: &mut Ctx<'_>) -> Doc<'s> {
        Doc::text(self.keyword.to_ascii_lowercase())
            .append(Doc::text(self.value))
            .append(Doc::text(">"))
    }
}

impl<'s> DocGen<'s> for Element<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        let tag_name = self.open_tag.tag_name;

        if self.void {
            ctx.debug(format_args!("<{tag_name}> void"));
            return Doc::list(vec![
                self.open_tag.doc(ctx),
                Doc::line_or_space(),
                Doc::text("/>"),
            ])
            .group();
        }

        if helpers::is_inline_tag(tag_name) {
            ctx.debug(format_args!("<{tag_name}> inline"));
            let mut docs = vec![self.open_tag.doc(ctx)];
            docs.push(ctx.indent(|ctx| {
                let mut inner = vec![Doc::line_or_nil(), Doc::text(">")];
                inner.push(format_children(&self.children, ctx));
                if let Some(close_tag) = &self.close_tag {
                    inner.push(close_tag.doc(ctx));
                }
                Doc::list(inner)
            }));
            if self.close_tag.is_some() {
                docs.push(Doc::line_or_nil());
                docs.push(Doc::text(">"));
            }
            return Doc::list(docs).group();
        }

        ctx.debug(format_args!("<{tag_name}> block"));
        let mut open = vec![self.open_tag.doc(ctx)];
        if !self.children.is_empty() {
            open.push(Doc::line_or_nil());
        }
        open.push(Doc::text(">"));
        let mut docs = vec![Doc::list(open).group()];

        let pre = helpers::is_pre_element(self);
        if !self.children.is_empty() {
            if pre {
                ctx.debug(format_args!("<{tag_name}> preserves whitespace"));
                docs.push(ctx.preserving_whitespace(|ctx| {
                    Doc::list(self.children.iter().map(|child| child.doc(ctx)).collect())
                }));
            } else if let Some(language) = embedded_language(self) {
                ctx.debug(format_args!("<{tag_name}> embeds {language}"));
                docs.push(embedded_body(self, &language, ctx));
            } else {
                docs.push(
                    ctx.indent(|ctx| Doc::line_or_nil().append(format_children(&self.children, ctx))),
                );
            }
        }

        if let Some(close_tag) = &self.close_tag {
            if !pre {
                docs.push(Doc::line_or_nil());
            }
            docs.push(close_tag.doc(ctx));
            docs.push(Doc::text(">"));
        }
        Doc::list(docs).group()
    }
}

impl<'s> DocGen<'s> for ErbBegin<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, self.end_node.as_ref(), ctx, |ctx, docs| {
            for clause in [&self.rescue_clause, &self.else_clause, &self.ensure_clause]
                .into_iter()
                .flatten()
            {
                docs.push(Doc::line_or_nil());
                docs.push(clause.doc(ctx));
            }
        })
    }
}

impl<'s> DocGen<'s> for ErbBlock<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &[], self.end_node.as_ref(), ctx, |ctx, docs| {
            if !self.body.is_empty() {
                docs.push(ctx.indent(|ctx| {
                    Doc::line_or_nil().append(format_children(&self.body, ctx))
                }));
            }
        })
    }
}

impl<'s> DocGen<'s> for ErbCase<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &[], self.end_node.as_ref(), ctx, |ctx, docs| {
            // Between the subject and the first branch only whitespace and
            // comments can occur; skip the gap when it is all blank.
            if self.children.iter().any(|child| !helpers::is_blank(child)) {
                docs.push(Doc::line_or_nil());
                docs.push(format_children(&self.children, ctx));
            }
            if !self.conditions.is_empty() {
                docs.push(Doc::line_or_nil());
                docs.push(format_children(&self.conditions, ctx));
            }
            if let Some(else_clause) = &self.else_clause {
                docs.push(Doc::line_or_nil());
                docs.push(else_clause.doc(ctx));
            }
        })
    }
}

impl<'s> DocGen<'s> for ErbElse<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        let mut docs = vec![
            Doc::list(vec![
                Doc::text(self.tag.opening),
                Doc::line_or_space(),
                Doc::text(self.tag.content.trim()),
                Doc::line_or_space(),
                Doc::text(self.tag.closing),
            ])
            .group(),
        ];
        if !self.statements.is_empty() {
            docs.push(ctx.indent(|ctx| {
                Doc::line_or_nil().append(format_children(&self.statements, ctx))
            }));
        }
        Doc::list(docs)
    }
}

impl<'s> DocGen<'s> for ErbEnd<'s> {
    fn doc(&self, _: &mut Ctx<'_>) -> Doc<'s> {
        Doc::list(vec![
            Doc::text(self.tag.opening),
            Doc::line_or_space(),
            Doc::text(self.tag.content.trim()),
            Doc::line_or_space(),
            Doc::text(self.tag.closing),
        ])
        .group()
    }
}

impl<'s> DocGen<'s> for ErbEnsure<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, None, ctx, |_, _| {})
    }
}

impl<'s> DocGen<'s> for ErbFor<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, self.end_node.as_ref(), ctx, |_, _| {})
    }
}

impl<'s> DocGen<'s> for ErbIf<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, self.end_node.as_ref(), ctx, |ctx, docs| {
            if let Some(subsequent) = &self.subsequent {
                docs.push(Doc::line_or_nil());
                docs.push(subsequent.doc(ctx));
            }
        })
    }
}

impl<'s> DocGen<'s> for ErbIn<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, None, ctx, |_, _| {})
    }
}

impl<'s> DocGen<'s> for ErbRescue<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, None, ctx, |ctx, docs| {
            if let Some(subsequent) = &self.subsequent {
                docs.push(Doc::line_or_nil());
                docs.push(subsequent.doc(ctx));
            }
        })
    }
}

impl<'s> DocGen<'s> for ErbTag<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        let mut docs = vec![Doc::text(self.opening)];

        // Comment tags pass through untouched.
        if self.opening.starts_with("<%#") {
            docs.push(reflow_raw(self.content));
            docs.push(Doc::text(self.closing));
            return Doc::list(docs);
        }

        docs.push(ctx.indent(|ctx| {
            let formatted = ctx.format_code(self.content);
            Doc::line_or_space().append(reflow_formatted(&formatted))
        }));
        docs.push(Doc::line_or_space());
        docs.push(Doc::text(self.closing));
        Doc::list(docs)
    }
}

impl<'s> DocGen<'s> for ErbUnless<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, self.end_node.as_ref(), ctx, |ctx, docs| {
            if let Some(else_clause) = &self.else_clause {
                docs.push(Doc::line_or_nil());
                docs.push(else_clause.doc(ctx));
            }
        })
    }
}

impl<'s> DocGen<'s> for ErbUntil<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, self.end_node.as_ref(), ctx, |_, _| {})
    }
}

impl<'s> DocGen<'s> for ErbWhen<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, None, ctx, |_, _| {})
    }
}

impl<'s> DocGen<'s> for ErbWhile<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_keyword(&self.tag, &self.statements, self.end_node.as_ref(), ctx, |_, _| {})
    }
}

impl<'s> DocGen<'s> for Literal<'s> {
    fn doc(&self, _: &mut Ctx<'_>) -> Doc<'s> {
        reflow_raw(self.raw)
    }
}

impl<'s> DocGen<'s> for NativeAttribute<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        let name = if helpers::is_case_insensitive_attribute(self.name) {
            Doc::text(helpers::lowercased(self.name))
        } else {
            Doc::text(self.name)
        };
        match &self.value {
            Some(value) => name.append(Doc::text("=")).append(value.doc(ctx)),
            None => name,
        }
    }
}

impl<'s> DocGen<'s> for Node<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        match self {
            Node::Comment(comment) => comment.doc(ctx),
            Node::Doctype(doctype) => doctype.doc(ctx),
            Node::Element(element) => element.doc(ctx),
            Node::ErbBegin(erb_begin) => erb_begin.doc(ctx),
            Node::ErbBlock(erb_block) => erb_block.doc(ctx),
            Node::ErbCase(erb_case) => erb_case.doc(ctx),
            Node::ErbCaseMatch(erb_case_match) => erb_case_match.doc(ctx),
            Node::ErbContent(erb_tag) => erb_tag.doc(ctx),
            Node::ErbElse(erb_else) => erb_else.doc(ctx),
            Node::ErbEnd(erb_end) => erb_end.doc(ctx),
            Node::ErbEnsure(erb_ensure) => erb_ensure.doc(ctx),
            Node::ErbFor(erb_for) => erb_for.doc(ctx),
            Node::ErbIf(erb_if) => erb_if.doc(ctx),
            Node::ErbIn(erb_in) => erb_in.doc(ctx),
            Node::ErbRescue(erb_rescue) => erb_rescue.doc(ctx),
            Node::ErbUnless(erb_unless) => erb_unless.doc(ctx),
            Node::ErbUntil(erb_until) => erb_until.doc(ctx),
            Node::ErbWhen(erb_when) => erb_when.doc(ctx),
            Node::ErbWhile(erb_while) => erb_while.doc(ctx),
            Node::Literal(literal) => literal.doc(ctx),
            Node::Text(text_node) => text_node.doc(ctx),
        }
    }
}

impl<'s> DocGen<'s> for OpenTag<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        let mut docs = vec![Doc::text("<"), Doc::text(helpers::lowercased(self.tag_name))];
        if !self.attrs.is_empty() {
            docs.push(ctx.indent(|ctx| {
                Doc::line_or_space().concat(itertools::intersperse(
                    self.attrs
                        .iter()
                        .map(|attr| attr.doc(ctx))
                        .collect::<Vec<_>>(),
                    Doc::line_or_space(),
                ))
            }));
        }
        // The `>` is emitted by the parent element.
        Doc::list(docs).group()
    }
}

impl<'s> DocGen<'s> for Root<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        format_children(&self.children, ctx).group()
    }
}

impl<'s> DocGen<'s> for TextNode<'s> {
    fn doc(&self, ctx: &mut Ctx<'_>) -> Doc<'s> {
        if ctx.preserve_whitespace() {
            return reflow_raw(self.raw).group();
        }

        let docs: Vec<_> = itertools::intersperse(
            self.raw.split_ascii_whitespace().map(Doc::text),
            Doc::soft_line(),
        )
        .collect();

        if docs.is_empty() {
            Doc::nil()
        } else {
            Doc::list(docs).group()
        }
    }
}

fn format_keyword<'b, 's>(
    tag: &ErbTag<'s>,
    statements: &[Node<'s>],
    end_node: Option<&ErbEnd<'s>>,
    ctx: &mut Ctx<'b>,
    trailing: impl FnOnce(&mut Ctx<'b>, &mut Vec<Doc<'s>>),
) -> Doc<'s> {
    let mut tag_docs = vec![Doc::text(tag.opening)];
    tag_docs.push(ctx.indent(|ctx| {
        let formatted = ctx.format_fragment(tag.content);
        Doc::line_or_space().append(reflow_formatted(&formatted))
    }));
    tag_docs.push(Doc::line_or_space());
    tag_docs.push(Doc::text(tag.closing));

    let mut docs = vec![Doc::list(tag_docs).group()];
    if !statements.is_empty() {
        docs.push(ctx.indent(|ctx| Doc::line_or_nil().append(format_children(statements, ctx))));
    }
    trailing(ctx, &mut docs);
    if let Some(end_node) = end_node {
        docs.push(Doc::line_or_nil());
        docs.push(end_node.doc(ctx));
    }
    Doc::list(docs)
}

/// Lays out an ordered sibling list. Blank lines in the source split the
/// siblings into groups; any run of blank lines collapses to exactly one
/// blank line between the formatted groups.
pub(crate) fn format_children<'s>(children: &[Node<'s>], ctx: &mut Ctx<'_>) -> Doc<'s> {
    match children {
        [] => Doc::nil(),
        [child] => child.doc(ctx),
        _ => {
            let mut groups = Vec::new();
            let mut start = 0;
            for i in 1..children.len() {
                if helpers::ends_with_blank_line(&children[i - 1])
                    || helpers::starts_with_blank_line(&children[i])
                {
                    groups.push(&children[start..i]);
                    start = i;
                }
            }
            groups.push(&children[start..]);

            let mut docs = Vec::new();
            for group in groups {
                let Some(group) = trim_blank_edges(group) else {
                    continue;
                };
                if !docs.is_empty() {
                    docs.push(Doc::hard_line());
                    docs.push(Doc::hard_line());
                }
                docs.push(format_sibling_group(group, ctx));
            }
            Doc::list(docs)
        }
    }
}

fn trim_blank_edges<'a, 's>(group: &'a [Node<'s>]) -> Option<&'a [Node<'s>]> {
    let start = group.iter().position(|node| !helpers::is_blank(node))?;
    let end = group.iter().rposition(|node| !helpers::is_blank(node))?;
    Some(&group[start..=end])
}

fn format_sibling_group<'s>(group: &[Node<'s>], ctx: &mut Ctx<'_>) -> Doc<'s> {
    let mut docs: Vec<Doc<'s>> = Vec::with_capacity(group.len() * 2);
    let mut break_next = false;
    for (i, child) in group.iter().enumerate() {
        if helpers::is_blank(child) {
            continue;
        }

        let child_doc = if break_next {
            break_next = false;
            Doc::list(vec![Doc::line_or_space(), child.doc(ctx)]).group()
        } else {
            child.doc(ctx)
        };
        docs.push(child_doc);

        let Some(next) = group.get(i + 1) else {
            break;
        };
        if helpers::is_br_tag(child) && helpers::starts_with_whitespace(next) {
            // The whitespace after a <br> carries nothing of its own.
            docs.push(Doc::hard_line());
        } else if helpers::is_inline(child) && helpers::is_inline(next) {
            if helpers::starts_with_whitespace(next) {
                if let Some(previous) = docs.last_mut() {
                    splice_trailing_break(previous);
                }
            } else if helpers::ends_with_whitespace(child) {
                break_next = true;
            } else {
                docs.push(Doc::soft_nil());
            }
        } else {
            docs.push(Doc::hard_line());
        }
    }
    Doc::list(docs).group()
}

/// Joining two inline siblings across pure whitespace appends the breakable
/// onto the previous sibling's still-open group rather than emitting a node
/// of its own, so a break at that point hugs the left content. Groups that
/// have already been handed to a parent are never touched.
fn splice_trailing_break(previous: &mut Doc<'_>) {
    match previous {
        Doc::Group(children) => children.push(Doc::line_or_space()),
        _ => {
            let doc = std::mem::replace(previous, Doc::nil());
            *previous = doc.append(Doc::line_or_space()).group();
        }
    }
}

fn embedded_body<'s>(element: &Element<'s>, language: &str, ctx: &mut Ctx<'_>) -> Doc<'s> {
    if ctx.embedded_formatter.supported(language) {
        if let [Node::Text(text_node)] = element.children.as_slice() {
            ctx.debug(format_args!("formatting embedded {language}"));
            return ctx.indent(|ctx| {
                let formatted = ctx.format_embedded(language, text_node.raw);
                Doc::line_or_nil().append(reflow_formatted(&formatted))
            });
        }
    }

    ctx.debug(format_args!(
        "unsupported language or more than one body child"
    ));
    ctx.indent(|ctx| {
        ctx.preserving_whitespace(|ctx| {
            Doc::line_or_nil().append(Doc::list(
                element.children.iter().map(|child| child.doc(ctx)).collect(),
            ))
        })
    })
}

/// Resolves the embedded language of a `<script>`/`<style>` element from its
/// `type` attribute. A value that cannot be read statically maps to the
/// sentinel `unknown`, which no adapter supports.
fn embedded_language(element: &Element) -> Option<String> {
    let default = if element.open_tag.tag_name.eq_ignore_ascii_case("script") {
        "text/javascript"
    } else if element.open_tag.tag_name.eq_ignore_ascii_case("style") {
        "text/css"
    } else {
        return None;
    };
    Some(match helpers::tag_attribute(element, "type") {
        AttributeLookup::Literal(value) => value.to_ascii_lowercase(),
        AttributeLookup::Dynamic => "unknown".to_owned(),
        AttributeLookup::Absent => default.to_owned(),
    })
}

fn reflow_raw<'s>(raw: &'s str) -> Doc<'s> {
    if !helpers::has_line_break(raw) {
        return Doc::text(raw);
    }
    Doc::list(
        itertools::intersperse(
            raw.split('\n')
                .map(|line| Doc::text(line.strip_suffix('\r').unwrap_or(line))),
            Doc::empty_line(),
        )
        .collect(),
    )
}

fn reflow_raw_owned(raw: &str) -> Doc<'static> {
    if !helpers::has_line_break(raw) {
        return Doc::text(raw.to_owned());
    }
    Doc::list(
        itertools::intersperse(
            raw.split('\n')
                .map(|line| Doc::text(line.strip_suffix('\r').unwrap_or(line).to_owned())),
            Doc::empty_line(),
        )
        .collect(),
    )
}

/// Lines already formatted by a sub-formatter keep their own breaks, each
/// rendered as a forced break at the current indentation.
fn reflow_formatted(formatted: &str) -> Doc<'static> {
    if !helpers::has_line_break(formatted) {
        return Doc::text(formatted.to_owned());
    }
    Doc::list(
        itertools::intersperse(
            formatted
                .split('\n')
                .map(|line| Doc::text(line.strip_suffix('\r').unwrap_or(line).to_owned())),
            Doc::hard_line(),
        )
        .collect(),
    )
}
