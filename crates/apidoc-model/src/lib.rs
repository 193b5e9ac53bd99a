//! Declaration model for apidoc.
//!
//! Holds the input descriptors of one documentation run and the immutable
//! [`DeclarationGraph`] built from them, plus the link providers that compute
//! relative paths between generated pages.
//!
//! # Example
//!
//! ```
//! use apidoc_model::{DeclarationGraph, PageNaming, PageRef, Snapshot, TypeLinkProvider};
//!
//! let snapshot = Snapshot::from_json(r#"{
//!     "packages": [{"name": "a.b.c"}, {"name": "a.b.d"}],
//!     "types": [{
//!         "qualified_name": "a.b.d.E",
//!         "simple_name": "E",
//!         "kind": "class",
//!         "enclosing": {"package": "a.b.d"}
//!     }]
//! }"#).unwrap();
//! let graph = DeclarationGraph::from_snapshot(snapshot, "java.lang.Object").unwrap();
//!
//! let source = PageRef::Package(graph.package_by_name("a.b.c").unwrap());
//! let target = graph.type_by_name("a.b.d.E").unwrap();
//! let links = TypeLinkProvider::new(PageNaming::new(&graph, "md"));
//! assert_eq!(links.relative_link(source, target).as_deref(), Some("../d/E.md"));
//! ```

mod decl;
mod graph;
mod link;

pub use decl::{
    AnnotationElement, AnnotationUse, AnnotationValue, Deprecation, DocNode, Enclosing,
    ExternalAnnotation, Member, MemberKind, Modifier, Modifiers, PackageDecl, Param, Snapshot,
    TypeDecl, TypeKind, TypeParam, TypeRef, simple_name_of,
};
pub use graph::{
    DEFAULT_ROOT_TYPE, DeclarationGraph, GraphBuilder, GraphError, PackageId, TypeId,
};
pub use link::{NESTED_SEPARATOR, PackageLinkProvider, PageNaming, PageRef, TypeLinkProvider};
