//! Package index pages.

use apidoc_content::{Content, Node, Sequence, TabbedBlock, Table, Text};
use apidoc_model::{PackageId, TypeKind};

use super::{PageContext, PageErrorKind, code_block, frontmatter, push_block};

const CONTENTS_TABS: [(&str, TypeKind); 5] = [
    ("Interfaces", TypeKind::Interface),
    ("Classes", TypeKind::Class),
    ("Enums", TypeKind::Enum),
    ("Records", TypeKind::Record),
    ("Annotation Types", TypeKind::Annotation),
];

pub(crate) fn package_page(
    ctx: &PageContext<'_>,
    id: PackageId,
) -> Result<Content, PageErrorKind> {
    let package = ctx.graph.package(id);
    let mut page = Sequence::new();

    page.push(frontmatter(&[("title", &package.name)]));
    push_block(&mut page, Text::raw(format!("# Package: {}", package.name)));
    push_block(&mut page, Text::raw("---"));

    let annotations = ctx.code_annotations().render(&package.annotations);
    push_block(
        &mut page,
        code_block(&format!("{annotations}package {};", package.name)),
    );
    push_block(&mut page, Text::raw(ctx.description(&package.doc)?));

    push_block(&mut page, Text::raw("### Package Contents"));
    let contents = contents(ctx, id)?;
    if contents.is_empty() {
        push_block(&mut page, Text::new("No types found."));
    } else {
        push_block(&mut page, contents);
    }

    let related = related(ctx, id)?;
    if !related.is_empty() {
        push_block(&mut page, Text::raw("### Related"));
        push_block(&mut page, related);
    }

    Ok(page.into())
}

fn contents(ctx: &PageContext<'_>, id: PackageId) -> Result<Content, PageErrorKind> {
    let prefix = format!("{}.", ctx.graph.package(id).name);
    let mut block = TabbedBlock::new(ctx.options.table_style, "All Types")
        .with_headers(["Class", "Description"])
        .with_key("package-contents");
    for (label, kind) in CONTENTS_TABS {
        block = block.with_tab(label, move |k: &TypeKind| *k == kind);
    }

    for &ty in ctx.graph.types_in_package(id) {
        let decl = ctx.graph.type_decl(ty);
        let name = decl
            .qualified_name
            .strip_prefix(&prefix)
            .unwrap_or(&decl.simple_name)
            .to_owned();
        block.add_row(
            decl.kind,
            [
                Text::raw(ctx.links.named(&decl.qualified_name, name)),
                Text::raw(ctx.summary(&decl.doc)?),
            ],
        )?;
    }
    Ok(block.into())
}

fn related(ctx: &PageContext<'_>, id: PackageId) -> Result<Content, PageErrorKind> {
    let mut table = Table::new(ctx.options.table_style).with_headers(["Package", "Description"]);
    let parent = ctx.graph.parent_package(id);
    for &other in parent.iter().chain(ctx.graph.child_packages(id)) {
        table.add_row([
            Text::raw(ctx.links.package(other, true)),
            Text::raw(ctx.summary(&ctx.graph.package(other).doc)?),
        ])?;
    }
    Ok(table.into())
}

#[cfg(test)]
mod tests {
    use apidoc_content::render;
    use apidoc_model::{PageNaming, PageRef};

    use super::*;
    use crate::RenderOptions;
    use crate::tests::graph_from_json;

    const JSON: &str = r#"{
        "packages": [
            {"name": "a.b"},
            {"name": "a.b.c", "doc": [{"kind": "text", "text": "Core types. More text."}]},
            {"name": "a.b.c.d"}
        ],
        "types": [
            {"qualified_name": "a.b.c.Run", "simple_name": "Run", "kind": "interface",
             "enclosing": {"package": "a.b.c"},
             "doc": [{"kind": "text", "text": "Runs things."}]},
            {"qualified_name": "a.b.c.Task", "simple_name": "Task", "kind": "class",
             "enclosing": {"package": "a.b.c"}},
            {"qualified_name": "a.b.c.Task.Step", "simple_name": "Step", "kind": "class",
             "enclosing": {"type": "a.b.c.Task"}}
        ]
    }"#;

    fn render_page(json: &str, package: &str) -> String {
        let graph = graph_from_json(json);
        let options = RenderOptions {
            table_style: apidoc_content::TableStyle::Markdown,
            ..RenderOptions::default()
        };
        let id = graph.package_by_name(package).unwrap();
        let ctx = PageContext::new(PageNaming::new(&graph, "md"), &options, PageRef::Package(id));
        render(&package_page(&ctx, id).unwrap(), "\n")
    }

    #[test]
    fn test_package_page_layout() {
        let text = render_page(JSON, "a.b.c");

        assert!(text.starts_with("---\ntitle: a.b.c\n---\n# Package: a.b.c\n\n---\n\n"));
        assert!(text.contains("```java\npackage a.b.c;\n```\n\nCore types. More text.\n\n"));
        assert!(text.contains("### Package Contents\n\n:::tabs key:package-contents\n"));
    }

    #[test]
    fn test_contents_tabs_by_kind() {
        let text = render_page(JSON, "a.b.c");

        assert!(text.contains(
            "== Interfaces\n|Class|Description|\n|---|---|\n|[Run](Run.md)|Runs things.|\n"
        ));
        assert!(text.contains(
            "== Classes\n|Class|Description|\n|---|---|\n\
             |[Task](Task.md)||\n|[Task.Step](Task$Step.md)||\n"
        ));
    }

    #[test]
    fn test_related_packages() {
        let text = render_page(JSON, "a.b.c");

        assert!(text.contains(
            "### Related\n\n|Package|Description|\n|---|---|\n\
             |[a.b](../index.md)||\n|[a.b.c.d](d/index.md)||\n"
        ));
    }

    #[test]
    fn test_empty_package() {
        let text = render_page(JSON, "a.b.c.d");

        assert!(text.contains("### Package Contents\n\nNo types found.\n\n"));
        assert!(text.contains("|[a.b.c](../index.md)|Core types.|\n"));
    }
}
