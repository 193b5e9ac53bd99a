//! Type pages.
//!
//! Layout, top to bottom: header and relations, the declaration signature,
//! the description and its block tags, then one summary table and one
//! details container per member kind present on the type.

use std::fmt::Write;

use apidoc_content::{
    Container, ContainerKind, Content, Section, Sequence, TabGroup, Table, Text, Wrapper,
};
use apidoc_model::{
    DocNode, Member, MemberKind, Modifier, TypeDecl, TypeId, TypeKind, TypeParam, simple_name_of,
};

use super::{
    PageContext, PageErrorKind, add_block, code_block, frontmatter, join_words, labelled,
    push_block, shown_modifiers,
};
use crate::display::DisplayMode;
use crate::links::declared_type;
use crate::markup::{MarkupError, block_tags};
use crate::member::{Column, MemberFacts, MemberStrategy, STRATEGIES};

const FUNCTIONAL_NOTICE: &str = "This is a functional interface and can therefore be used as \
     the assignment target for a lambda expression or method reference.";

/// Comment block tags listed under the description, with their labels.
const TYPE_TAGS: [(&str, &str); 4] = [
    ("since", "Since"),
    ("version", "Version"),
    ("author", "Author"),
    ("see", "See Also"),
];

pub(crate) fn type_page(ctx: &PageContext<'_>, id: TypeId) -> Result<Content, PageErrorKind> {
    let graph = ctx.graph;
    let decl = graph.type_decl(id);
    let mut page = Sequence::new();

    page.push(frontmatter(&[
        ("title", &decl.simple_name),
        ("aside", "false"),
        ("sidebar", "false"),
    ]));
    push_block(
        &mut page,
        Text::raw(format!(
            "_Package:_ {}",
            ctx.links.package(graph.package_of(id), true)
        )),
    );
    let title = ctx.links.display().build(&declared_type(graph, id));
    push_block(&mut page, Text::raw(format!("# {} {title}", decl.kind.label())));

    if ctx.options.show_hierarchy && decl.kind == TypeKind::Class {
        push_block(&mut page, hierarchy(ctx, id)?);
    }
    push_block(&mut page, type_parameters(ctx, decl)?);
    for block in relations(ctx, id) {
        push_block(&mut page, block);
    }
    if decl.functional {
        push_block(
            &mut page,
            labelled("Functional Interface", &[FUNCTIONAL_NOTICE.to_owned()], ""),
        );
    }

    push_block(&mut page, Text::raw("---"));
    push_block(&mut page, code_block(&type_signature(ctx, id)));
    if let Some(notice) = ctx.deprecation(decl.deprecated.as_ref())? {
        push_block(&mut page, notice);
    }
    push_block(&mut page, Text::raw(ctx.description(&decl.doc)?));
    if !ctx.options.no_comment {
        for (tag, label) in TYPE_TAGS {
            push_block(&mut page, tag_list(ctx, &decl.doc, tag, label)?);
        }
    }

    push_block(&mut page, nested_summary(ctx, id)?);
    for strategy in &STRATEGIES {
        let members: Vec<&Member> = decl
            .members
            .iter()
            .filter(|m| m.kind == strategy.kind)
            .collect();
        if members.is_empty() {
            continue;
        }
        push_block(&mut page, Text::raw(format!("### {}", strategy.summary_label)));
        push_block(&mut page, member_summary(ctx, strategy, id, &members)?);
    }
    for strategy in &STRATEGIES {
        let mut details = Sequence::new();
        for member in decl.members.iter().filter(|m| m.kind == strategy.kind) {
            details.push(member_detail(ctx, strategy, member)?);
        }
        push_block(
            &mut page,
            Container::new(ContainerKind::Info, details)
                .with_header(Text::new(strategy.details_label)),
        );
    }

    tracing::debug!(
        page = %decl.qualified_name,
        members = decl.members.len(),
        "Assembled type page"
    );
    Ok(page.into())
}

/// Visible superclass chain, one indented line per level, ending with the type itself.
fn hierarchy(ctx: &PageContext<'_>, id: TypeId) -> Result<Text, PageErrorKind> {
    let links = ctx.links.with_mode(DisplayMode::PackageQualified);
    let mut lines: Vec<String> = ctx
        .graph
        .ancestor_chain(id)?
        .iter()
        .map(|ty| links.type_ref(ty))
        .collect();
    lines.push(links.type_id(id));

    let mut text = String::new();
    for (depth, line) in lines.iter().enumerate() {
        if depth > 0 {
            text.push_str("<br>\n");
            text.push_str(&"&ensp;".repeat(depth));
            text.push_str("↳ ");
        }
        text.push_str(line);
    }
    Ok(Text::raw(text))
}

/// `@param <T>` descriptions.
fn type_parameters(ctx: &PageContext<'_>, decl: &TypeDecl) -> Result<Text, MarkupError> {
    if ctx.options.no_comment {
        return Ok(Text::default());
    }
    let mut entries = Vec::new();
    for tag in block_tags(&decl.doc).filter(|t| t.name == "param") {
        let Some(name) = tag
            .param
            .and_then(|p| p.strip_prefix('<'))
            .and_then(|p| p.strip_suffix('>'))
        else {
            continue;
        };
        entries.push(format!("`{name}` - {}", ctx.markup.render(tag.body)?));
    }
    Ok(labelled("Type Parameters", &entries, "<br>\n"))
}

fn relations(ctx: &PageContext<'_>, id: TypeId) -> Vec<Text> {
    let graph = ctx.graph;
    let decl = graph.type_decl(id);

    let interfaces: Vec<String> = decl
        .interfaces
        .iter()
        .filter(|ty| ty.declared_name().is_none_or(|name| graph.is_visible(name)))
        .map(|ty| ctx.links.type_ref(ty))
        .collect();
    let interface_label = if decl.is_interface() {
        "All Extended Interfaces"
    } else {
        "All Implemented Interfaces"
    };

    let implementors = graph.direct_implementors(id);
    let (subinterfaces, implementing): (Vec<TypeId>, Vec<TypeId>) = implementors
        .iter()
        .partition(|&&t| graph.type_decl(t).is_interface());
    let subinterfaces = type_links(ctx, subinterfaces);
    let implementing = type_links(ctx, implementing);
    let subclasses = type_links(ctx, graph.direct_subtypes(id).iter().copied());

    let enclosing = graph.enclosing_type(id).map(|outer| {
        let label = if graph.type_decl(outer).is_interface() {
            "Enclosing Interface"
        } else {
            "Enclosing Class"
        };
        labelled(label, &[ctx.links.type_id(outer)], "")
    });

    let mut blocks = vec![
        labelled(interface_label, &interfaces, ", "),
        labelled("Direct Known Subclasses", &subclasses, ", "),
        labelled("Direct Known Subinterfaces", &subinterfaces, ", "),
        labelled("All Known Implementing Classes", &implementing, ", "),
    ];
    blocks.extend(enclosing);
    blocks
}

fn type_links(ctx: &PageContext<'_>, ids: impl IntoIterator<Item = TypeId>) -> Vec<String> {
    ids.into_iter().map(|id| ctx.links.type_id(id)).collect()
}

/// Declaration as written in source, generics unescaped.
fn type_signature(ctx: &PageContext<'_>, id: TypeId) -> String {
    let graph = ctx.graph;
    let decl = graph.type_decl(id);
    let display = ctx.links.display().plain();
    let name = display.build(&declared_type(graph, id));

    let mut modifiers = decl.modifiers.clone();
    if decl.is_interface() {
        modifiers.0.retain(|m| *m != Modifier::Abstract);
    }
    let mut signature = ctx.code_annotations().render(&decl.annotations);
    signature.push_str(&join_words([
        modifiers.keywords().as_str(),
        decl.kind.keyword(),
        name.as_str(),
    ]));

    if decl.kind == TypeKind::Class
        && let Some(superclass) = &decl.superclass
        && superclass.declared_name() != Some(graph.root_type())
    {
        let _ = write!(signature, " extends {}", display.build(superclass));
    }
    if !decl.interfaces.is_empty() {
        let keyword = if decl.is_interface() { "extends" } else { "implements" };
        let names: Vec<String> = decl.interfaces.iter().map(|ty| display.build(ty)).collect();
        let _ = write!(signature, " {keyword} {}", names.join(", "));
    }
    signature
}

fn tag_list(
    ctx: &PageContext<'_>,
    doc: &[DocNode],
    tag: &str,
    label: &str,
) -> Result<Text, MarkupError> {
    let entries = block_tags(doc)
        .filter(|t| t.name == tag)
        .map(|t| ctx.markup.render(t.body))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(labelled(label, &entries, ", "))
}

fn nested_summary(ctx: &PageContext<'_>, id: TypeId) -> Result<Content, PageErrorKind> {
    let nested = ctx.graph.nested_types(id);
    if nested.is_empty() {
        return Ok(Sequence::new().into());
    }
    let outer = &ctx.graph.type_decl(id).qualified_name;
    let mut table = Table::new(ctx.options.table_style)
        .with_headers(["Modifier and Type", "Class", "Description"])
        .with_caption("Nested Classes");
    for &inner in nested {
        let decl = ctx.graph.type_decl(inner);
        let relative = match decl.qualified_name.strip_prefix(outer.as_str()) {
            Some(rest) => format!("{}{rest}", simple_name_of(outer)),
            None => decl.simple_name.clone(),
        };
        table.add_row([
            Text::new(join_words([
                shown_modifiers(&decl.modifiers).as_str(),
                decl.kind.keyword(),
            ])),
            Text::raw(ctx.links.named(&decl.qualified_name, relative)),
            Text::raw(ctx.summary(&decl.doc)?),
        ])?;
    }
    Ok(Sequence::new()
        .with(Text::raw("### Nested Class Summary\n\n"))
        .with(table)
        .into())
}

fn member_summary(
    ctx: &PageContext<'_>,
    strategy: &MemberStrategy,
    owner: TypeId,
    members: &[&Member],
) -> Result<Content, PageErrorKind> {
    let decl = ctx.graph.type_decl(owner);
    let mut block = strategy.summary_table(ctx.options.table_style);
    if strategy.kind == MemberKind::Method {
        block = block.with_key("methods");
    }
    for member in members {
        let cells = strategy
            .columns
            .iter()
            .map(|column| summary_cell(ctx, strategy, owner, member, *column))
            .collect::<Result<Vec<_>, _>>()?;
        block.add_row(MemberFacts::of(decl, member), cells)?;
    }
    Ok(block.into())
}

fn summary_cell(
    ctx: &PageContext<'_>,
    strategy: &MemberStrategy,
    owner: TypeId,
    member: &Member,
    column: Column,
) -> Result<Text, MarkupError> {
    let links = ctx.links;
    let cell = match column {
        Column::ModifierAndType => {
            let modifiers = if member.kind == MemberKind::AnnotationElement {
                String::new()
            } else {
                shown_modifiers(&member.modifiers)
            };
            join_words([
                modifiers.as_str(),
                type_params(ctx, &member.type_params, false).as_str(),
                member.ty.as_ref().map(|ty| links.type_ref(ty)).unwrap_or_default().as_str(),
            ])
        }
        Column::Modifier => shown_modifiers(&member.modifiers),
        Column::Type => member
            .ty
            .as_ref()
            .map(|ty| links.type_ref(ty))
            .unwrap_or_default(),
        Column::Name => {
            let mut name = links.member(owner, &strategy.anchor(member), &member.name);
            if matches!(member.kind, MemberKind::Method | MemberKind::Constructor) {
                let _ = write!(name, "({})", parameters(ctx, member, true));
            }
            name
        }
        Column::Description => match &member.deprecated {
            Some(deprecated) => {
                let reason = ctx.summary(&deprecated.doc)?;
                join_words(["**Deprecated.**", reason.as_str()])
            }
            None => ctx.summary(&member.doc)?,
        },
    };
    Ok(Text::raw(cell))
}

/// `<T, U>` type parameter list, linked or plain.
fn type_params(ctx: &PageContext<'_>, params: &[TypeParam], plain: bool) -> String {
    if params.is_empty() {
        return String::new();
    }
    let display = if plain {
        ctx.links.display().plain()
    } else {
        ctx.links.display()
    };
    let names: Vec<String> = params
        .iter()
        .map(|p| display.build(&p.to_type_ref()))
        .collect();
    if plain {
        format!("<{}>", names.join(", "))
    } else {
        format!("\\<{}\\>", names.join(", "))
    }
}

/// `Type name` pairs, linked for summaries or plain for signatures.
fn parameters(ctx: &PageContext<'_>, member: &Member, linked: bool) -> String {
    let annotations = ctx.code_annotations().with_line_break(false);
    member
        .params
        .iter()
        .map(|param| {
            let mut ty = if linked {
                ctx.links.type_ref(&param.ty)
            } else {
                ctx.links.display().plain().build(&param.ty)
            };
            if param.varargs
                && let Some(stripped) = ty.strip_suffix("[]")
            {
                ty = format!("{stripped}...");
            }
            let annotations = if linked {
                String::new()
            } else {
                annotations.render(&param.annotations)
            };
            join_words([annotations.as_str(), ty.as_str(), param.name.as_str()])
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn member_signature(ctx: &PageContext<'_>, member: &Member) -> String {
    let plain = ctx.links.display().plain();
    let ty = member
        .ty
        .as_ref()
        .map(|ty| plain.build(ty))
        .unwrap_or_default();
    let mut signature = ctx.code_annotations().render(&member.annotations);

    let declaration = match member.kind {
        MemberKind::EnumConstant => member.name.clone(),
        MemberKind::Field | MemberKind::Property => {
            let mut field = join_words([
                member.modifiers.keywords().as_str(),
                ty.as_str(),
                member.name.as_str(),
            ]);
            if let Some(value) = &member.constant_value {
                let _ = write!(field, " = {value}");
            }
            field
        }
        MemberKind::AnnotationElement => {
            let mut element = join_words([ty.as_str(), format!("{}()", member.name).as_str()]);
            if let Some(value) = &member.default_value {
                let rendered = ctx.code_annotations().render_value(value);
                let _ = write!(element, " default {rendered}");
            }
            element
        }
        MemberKind::Method | MemberKind::Constructor => {
            let mut method = join_words([
                member.modifiers.keywords().as_str(),
                type_params(ctx, &member.type_params, true).as_str(),
                ty.as_str(),
                format!("{}({})", member.name, parameters(ctx, member, false)).as_str(),
            ]);
            if !member.throws.is_empty() {
                let throws: Vec<String> = member.throws.iter().map(|t| plain.build(t)).collect();
                let _ = write!(method, " throws {}", throws.join(", "));
            }
            method
        }
    };
    signature.push_str(&declaration);
    signature
}

fn member_detail(
    ctx: &PageContext<'_>,
    strategy: &MemberStrategy,
    member: &Member,
) -> Result<Wrapper, PageErrorKind> {
    let mut tabs = TabGroup::new();
    tabs.add_tab(member.name.clone(), Sequence::new());
    let mut detail = Wrapper::new(Section::new(strategy.anchor(member), tabs))?;

    add_block(&mut detail, code_block(&member_signature(ctx, member)));
    if let Some(notice) = ctx.deprecation(member.deprecated.as_ref())? {
        add_block(&mut detail, notice);
    }
    add_block(&mut detail, Text::raw(ctx.description(&member.doc)?));

    if !ctx.options.no_comment {
        add_block(&mut detail, member_tags(ctx, member)?);
    }
    if let Some(value) = &member.default_value {
        let rendered = ctx.code_annotations().render_value(value);
        add_block(&mut detail, labelled("Default", &[format!("`{rendered}`")], ""));
    }
    Ok(detail)
}

/// Parameters, Returns and Throws entries from the comment block tags.
fn member_tags(ctx: &PageContext<'_>, member: &Member) -> Result<Sequence, MarkupError> {
    let mut params = Vec::new();
    let mut returns = Vec::new();
    let mut throws = Vec::new();
    for tag in block_tags(&member.doc) {
        match (tag.name, tag.param) {
            ("param", Some(name)) if !name.starts_with('<') => {
                params.push(format!("`{name}` - {}", ctx.markup.render(tag.body)?));
            }
            ("return", _) => returns.push(ctx.markup.render(tag.body)?),
            ("throws" | "exception", Some(name)) => {
                let target = ctx.links.named(name, format!("`{}`", simple_name_of(name)));
                throws.push(format!("{target} - {}", ctx.markup.render(tag.body)?));
            }
            _ => {}
        }
    }
    Ok(Sequence::new()
        .with(labelled("Parameters", &params, "<br>\n"))
        .with(labelled("Returns", &returns, "<br>\n"))
        .with(labelled("Throws", &throws, "<br>\n")))
}
