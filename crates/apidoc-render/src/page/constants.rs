//! The constant values page.

use std::collections::BTreeMap;

use apidoc_content::{Content, Sequence, Table, Text};
use apidoc_model::{DeclarationGraph, Member, MemberKind, TypeId};

use super::{PageContext, PageErrorKind, frontmatter, join_words, push_block, shown_modifiers};
use crate::member::MemberStrategy;

/// Package groups use the first two segments of the package name.
const GROUP_SEGMENTS: usize = 2;

fn constants(graph: &DeclarationGraph, id: TypeId) -> impl Iterator<Item = &Member> {
    graph
        .type_decl(id)
        .members
        .iter()
        .filter(|m| m.kind == MemberKind::Field && m.constant_value.is_some())
}

/// Whether any known type declares a constant field.
pub(crate) fn has_constants(graph: &DeclarationGraph) -> bool {
    graph.types().any(|id| constants(graph, id).next().is_some())
}

fn group_name(package: &str) -> String {
    package
        .split('.')
        .take(GROUP_SEGMENTS)
        .collect::<Vec<_>>()
        .join(".")
}

/// Every constant field grouped by abbreviated package, or `None` when
/// there are no constants at all.
pub(crate) fn constants_page(ctx: &PageContext<'_>) -> Result<Option<Content>, PageErrorKind> {
    let graph = ctx.graph;
    let mut groups: BTreeMap<String, Vec<TypeId>> = BTreeMap::new();
    for id in graph.types() {
        if constants(graph, id).next().is_some() {
            let package = &graph.package(graph.package_of(id)).name;
            groups.entry(group_name(package)).or_default().push(id);
        }
    }
    if groups.is_empty() {
        return Ok(None);
    }

    let mut page = Sequence::new();
    page.push(frontmatter(&[("title", "Constant Field Values")]));
    push_block(&mut page, Text::raw("# Constant Field Values"));

    let field = MemberStrategy::for_kind(MemberKind::Field);
    let group_count = groups.len();
    for (group, types) in groups {
        push_block(&mut page, Text::raw(format!("## {group}.*")));
        for id in types {
            let decl = graph.type_decl(id);
            let mut table = Table::new(ctx.options.table_style)
                .with_headers(["Modifier and Type", "Constant Field", "Value"])
                .with_caption(ctx.links.named(&decl.qualified_name, decl.qualified_name.clone()));
            for member in constants(graph, id) {
                let ty = member
                    .ty
                    .as_ref()
                    .map(|ty| ctx.links.type_ref(ty))
                    .unwrap_or_default();
                let value = member.constant_value.as_deref().unwrap_or_default();
                table.add_row([
                    Text::raw(join_words([
                        shown_modifiers(&member.modifiers).as_str(),
                        ty.as_str(),
                    ])),
                    Text::raw(ctx.links.member(id, &field.anchor(member), &member.name)),
                    Text::raw(format!("`{value}`")),
                ])?;
            }
            push_block(&mut page, table);
        }
    }

    tracing::debug!(groups = group_count, "Assembled constant values page");
    Ok(Some(page.into()))
}
