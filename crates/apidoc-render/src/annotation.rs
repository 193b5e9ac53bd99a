//! Annotation occurrence rendering.
//!
//! Only annotations whose type is marked as documented are shown. Element
//! lists follow the usual source elisions:
//!
//! - a lone `value` element is written without its key
//! - multi-valued arrays are braced, single values are not
//! - mandated occurrences show only their values
//! - a repeatable-annotation container holding documented annotations is
//!   replaced by the annotations it contains

use std::fmt::Write;

use apidoc_model::{AnnotationUse, AnnotationValue, DeclarationGraph, simple_name_of};

use crate::display::{DisplayMode, DisplayNameBuilder};
use crate::links::LinkBuilder;

/// Renders annotation occurrences as text.
#[derive(Clone, Copy, Debug)]
pub struct AnnotationRenderer<'a> {
    graph: &'a DeclarationGraph,
    links: Option<LinkBuilder<'a>>,
    line_break: bool,
}

impl<'a> AnnotationRenderer<'a> {
    pub fn new(graph: &'a DeclarationGraph) -> Self {
        Self {
            graph,
            links: None,
            line_break: false,
        }
    }

    /// Link annotation names to their type pages.
    #[must_use]
    pub fn with_links(self, links: LinkBuilder<'a>) -> Self {
        Self {
            links: Some(links),
            ..self
        }
    }

    /// Put every occurrence, and every element after the first, on its own line.
    #[must_use]
    pub fn with_line_break(self, line_break: bool) -> Self {
        Self { line_break, ..self }
    }

    /// Render every documented occurrence.
    ///
    /// Occurrences are separated by a space, or each terminated by `\n` in
    /// line-break mode.
    pub fn render(&self, occurrences: &[AnnotationUse]) -> String {
        let mut out = String::new();
        for rendered in occurrences.iter().filter_map(|occ| self.render_one(occ)) {
            if self.line_break {
                out.push_str(&rendered);
                out.push('\n');
            } else {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&rendered);
            }
        }
        out
    }

    /// Source form of a single element value.
    pub fn render_value(&self, value: &AnnotationValue) -> String {
        match value {
            AnnotationValue::Literal(text) => text.clone(),
            AnnotationValue::Type(ty) => format!(
                "{}.class",
                DisplayNameBuilder::new(self.graph)
                    .with_mode(DisplayMode::Qualified)
                    .build(ty)
            ),
            AnnotationValue::EnumConstant {
                type_name,
                constant,
            } => format!("{}.{constant}", simple_name_of(type_name)),
            AnnotationValue::Annotation(inner) => {
                self.with_line_break(false).invocation(inner, false)
            }
            AnnotationValue::Array(values) => {
                self.join_refs(&values.iter().collect::<Vec<_>>(), " ")
            }
        }
    }

    fn render_one(&self, occ: &AnnotationUse) -> Option<String> {
        let documented = self.graph.is_documented_annotation(&occ.type_name);
        let container = self.container_contents_documented(occ);
        if !documented && container != Some(true) {
            return None;
        }

        if occ.mandated {
            let values: Vec<&AnnotationValue> = occ
                .elements
                .iter()
                .flat_map(|element| flatten(&element.value))
                .collect();
            return Some(self.join_refs(&values, " "));
        }

        match container {
            Some(true) if occ.elements.len() == 1 => {
                let values = flatten(&occ.elements[0].value);
                Some(self.join_refs(&values, " "))
            }
            Some(_) => Some(self.invocation(occ, false)),
            None => Some(self.invocation(occ, self.line_break)),
        }
    }

    /// `Some(inner_documented)` when the occurrence holds an array of
    /// several annotations, i.e. acts as a repeatable-annotation container.
    fn container_contents_documented(&self, occ: &AnnotationUse) -> Option<bool> {
        occ.elements.iter().find_map(|element| match &element.value {
            AnnotationValue::Array(values) if values.len() > 1 => match &values[0] {
                AnnotationValue::Annotation(inner) => {
                    Some(self.graph.is_documented_annotation(&inner.type_name))
                }
                _ => None,
            },
            _ => None,
        })
    }

    /// `@Name(key=value,...)` form.
    fn invocation(&self, occ: &AnnotationUse, line_break: bool) -> String {
        let simple = occ.simple_name();
        let name = format!("@{simple}");
        let mut out = match &self.links {
            Some(links) => links.named(&occ.type_name, name),
            None => name,
        };
        if occ.elements.is_empty() {
            return out;
        }

        let keyed = occ.elements.len() > 1;
        out.push('(');
        for (i, element) in occ.elements.iter().enumerate() {
            if i > 0 {
                out.push(',');
                if line_break {
                    out.push('\n');
                    out.push_str(&" ".repeat(simple.len() + 2));
                }
            }
            if keyed || element.name != "value" {
                let _ = write!(out, "{}=", element.name);
            }
            let values = flatten(&element.value);
            if values.len() == 1 {
                out.push_str(&self.render_value(values[0]));
            } else {
                let _ = write!(out, "{{{}}}", self.join_refs(&values, ","));
            }
        }
        out.push(')');
        out
    }

    fn join_refs(&self, values: &[&AnnotationValue], separator: &str) -> String {
        values
            .iter()
            .map(|value| self.render_value(value))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Items of an array value, or the value itself.
fn flatten(value: &AnnotationValue) -> Vec<&AnnotationValue> {
    match value {
        AnnotationValue::Array(values) => values.iter().collect(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use apidoc_model::{AnnotationElement, ExternalAnnotation, PageNaming, PageRef, TypeRef};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tests::graph_with;

    fn documented(names: &[&str]) -> DeclarationGraph {
        let annotations: Vec<ExternalAnnotation> = names
            .iter()
            .map(|name| ExternalAnnotation {
                name: (*name).to_owned(),
                documented: true,
            })
            .collect();
        graph_with(&annotations)
    }

    fn occurrence(type_name: &str, elements: &[(&str, AnnotationValue)]) -> AnnotationUse {
        AnnotationUse {
            type_name: type_name.to_owned(),
            elements: elements
                .iter()
                .map(|(name, value)| AnnotationElement {
                    name: (*name).to_owned(),
                    value: value.clone(),
                })
                .collect(),
            mandated: false,
        }
    }

    fn lit(text: &str) -> AnnotationValue {
        AnnotationValue::Literal(text.to_owned())
    }

    #[test]
    fn test_value_element_forms() {
        let graph = documented(&["a.Name"]);
        let renderer = AnnotationRenderer::new(&graph);

        let array = occurrence(
            "a.Name",
            &[("value", AnnotationValue::Array(vec![lit("X"), lit("Y")]))],
        );
        let single = occurrence("a.Name", &[("value", lit("X"))]);
        let keyed = occurrence("a.Name", &[("a", lit("X")), ("b", lit("Y"))]);

        assert_eq!(renderer.render(&[array]), "@Name({X,Y})");
        assert_eq!(renderer.render(&[single]), "@Name(X)");
        assert_eq!(renderer.render(&[keyed]), "@Name(a=X,b=Y)");
    }

    #[test]
    fn test_single_element_array_is_not_braced() {
        let graph = documented(&["a.Name"]);
        let occ = occurrence("a.Name", &[("names", AnnotationValue::Array(vec![lit("X")]))]);

        assert_eq!(AnnotationRenderer::new(&graph).render(&[occ]), "@Name(names=X)");
    }

    #[test]
    fn test_undocumented_annotations_are_skipped() {
        let graph = documented(&["a.Shown"]);
        let occurrences = [
            occurrence("a.Hidden", &[]),
            occurrence("a.Shown", &[]),
            occurrence("a.Hidden", &[("value", lit("1"))]),
        ];

        assert_eq!(AnnotationRenderer::new(&graph).render(&occurrences), "@Shown");
    }

    #[test]
    fn test_mandated_occurrence_renders_values_only() {
        let graph = documented(&["a.Name"]);
        let mut occ = occurrence(
            "a.Name",
            &[("value", AnnotationValue::Array(vec![lit("1"), lit("2")]))],
        );
        occ.mandated = true;

        assert_eq!(AnnotationRenderer::new(&graph).render(&[occ]), "1 2");
    }

    #[test]
    fn test_container_with_documented_values_is_elided() {
        let graph = documented(&["a.Role"]);
        let role = |name: &str| {
            AnnotationValue::Annotation(Box::new(occurrence("a.Role", &[("value", lit(name))])))
        };
        let container = occurrence(
            "a.Roles",
            &[("value", AnnotationValue::Array(vec![role("\"admin\""), role("\"user\"")]))],
        );

        assert_eq!(
            AnnotationRenderer::new(&graph).render(&[container]),
            "@Role(\"admin\") @Role(\"user\")"
        );
    }

    #[test]
    fn test_container_with_extra_elements_keeps_syntax() {
        let graph = documented(&["a.Role"]);
        let role = |name: &str| {
            AnnotationValue::Annotation(Box::new(occurrence("a.Role", &[("value", lit(name))])))
        };
        let container = occurrence(
            "a.Roles",
            &[
                ("value", AnnotationValue::Array(vec![role("1"), role("2")])),
                ("strict", lit("true")),
            ],
        );

        assert_eq!(
            AnnotationRenderer::new(&graph).render(&[container]),
            "@Roles(value={@Role(1),@Role(2)},strict=true)"
        );
    }

    #[test]
    fn test_container_of_undocumented_values_is_skipped() {
        let graph = documented(&[]);
        let role = || AnnotationValue::Annotation(Box::new(occurrence("a.Role", &[])));
        let container = occurrence(
            "a.Roles",
            &[("value", AnnotationValue::Array(vec![role(), role()]))],
        );

        assert_eq!(AnnotationRenderer::new(&graph).render(&[container]), "");
    }

    #[test]
    fn test_line_break_mode_indents_elements() {
        let graph = documented(&["a.Mapping", "a.Marker"]);
        let occurrences = [
            occurrence("a.Mapping", &[("path", lit("\"/\"")), ("method", lit("GET"))]),
            occurrence("a.Marker", &[]),
        ];

        assert_eq!(
            AnnotationRenderer::new(&graph)
                .with_line_break(true)
                .render(&occurrences),
            "@Mapping(path=\"/\",\n         method=GET)\n@Marker\n"
        );
    }

    #[test]
    fn test_value_kinds() {
        let graph = documented(&["a.Name"]);
        let occ = occurrence(
            "a.Name",
            &[
                ("type", AnnotationValue::Type(TypeRef::declared("java.lang.String"))),
                (
                    "unit",
                    AnnotationValue::EnumConstant {
                        type_name: "java.util.concurrent.TimeUnit".to_owned(),
                        constant: "SECONDS".to_owned(),
                    },
                ),
            ],
        );

        assert_eq!(
            AnnotationRenderer::new(&graph).render(&[occ]),
            "@Name(type=java.lang.String.class,unit=TimeUnit.SECONDS)"
        );
    }

    #[test]
    fn test_names_link_to_known_annotation_types() {
        let graph = crate::tests::sample_graph();
        let naming = PageNaming::new(&graph, "md");
        let source = PageRef::Package(graph.package_by_name("a.b.c").unwrap());
        let renderer =
            AnnotationRenderer::new(&graph).with_links(LinkBuilder::new(naming, source));

        assert_eq!(
            renderer.render(&[occurrence("a.b.d.Marker", &[])]),
            "[@Marker](../d/Marker.md)"
        );
    }
}
