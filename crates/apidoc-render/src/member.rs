//! Per-kind member layout.
//!
//! Summaries and details of every member kind are produced by one generic
//! renderer. What differs between kinds (labels, table columns, tabs and
//! anchor ids) lives in a [`MemberStrategy`] record, one per kind, listed in
//! page order in [`STRATEGIES`].

use apidoc_content::{TabbedBlock, TableStyle};
use apidoc_model::{Member, MemberKind, Modifier, Param, TypeDecl, TypeRef};

/// Column of a member summary table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    ModifierAndType,
    Modifier,
    Type,
    /// Member name, headed by the strategy's name header.
    Name,
    Description,
}

/// Facts the summary tabs select members by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemberFacts {
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_default: bool,
    pub is_deprecated: bool,
    pub in_interface: bool,
}

impl MemberFacts {
    pub fn of(owner: &TypeDecl, member: &Member) -> Self {
        let in_interface = owner.is_interface();
        let is_static = member.modifiers.is_static();
        let is_default = member.modifiers.has(Modifier::Default);
        let implicitly_abstract = in_interface
            && member.kind == MemberKind::Method
            && !is_static
            && !is_default;
        Self {
            is_static,
            is_abstract: member.modifiers.has(Modifier::Abstract) || implicitly_abstract,
            is_default,
            is_deprecated: member.deprecated.is_some() || owner.deprecated.is_some(),
            in_interface,
        }
    }
}

/// A summary tab and the members it shows.
#[derive(Clone, Copy, Debug)]
pub struct MemberTab {
    pub label: &'static str,
    pub matches: fn(&MemberFacts) -> bool,
}

/// Layout record for one member kind.
#[derive(Clone, Copy, Debug)]
pub struct MemberStrategy {
    pub kind: MemberKind,
    pub summary_label: &'static str,
    pub details_label: &'static str,
    /// Label of the table when no tab applies.
    pub default_tab: &'static str,
    pub name_header: &'static str,
    pub columns: &'static [Column],
    pub tabs: &'static [MemberTab],
    pub anchor_id: fn(&Member) -> String,
}

fn is_static(facts: &MemberFacts) -> bool {
    facts.is_static
}

fn is_instance(facts: &MemberFacts) -> bool {
    !facts.is_static
}

fn is_abstract(facts: &MemberFacts) -> bool {
    facts.is_abstract
}

fn is_concrete(facts: &MemberFacts) -> bool {
    !facts.is_abstract && !facts.in_interface
}

fn is_default(facts: &MemberFacts) -> bool {
    facts.is_default
}

fn is_deprecated(facts: &MemberFacts) -> bool {
    facts.is_deprecated
}

const METHOD_TABS: &[MemberTab] = &[
    MemberTab {
        label: "Static Methods",
        matches: is_static,
    },
    MemberTab {
        label: "Instance Methods",
        matches: is_instance,
    },
    MemberTab {
        label: "Abstract Methods",
        matches: is_abstract,
    },
    MemberTab {
        label: "Concrete Methods",
        matches: is_concrete,
    },
    MemberTab {
        label: "Default Methods",
        matches: is_default,
    },
    MemberTab {
        label: "Deprecated Methods",
        matches: is_deprecated,
    },
];

/// Every member kind, in the order its sections appear on a type page.
pub const STRATEGIES: [MemberStrategy; 6] = [
    MemberStrategy {
        kind: MemberKind::EnumConstant,
        summary_label: "Enum Constant Summary",
        details_label: "Enum Constant Details",
        default_tab: "Enum Constants",
        name_header: "Enum Constant",
        columns: &[Column::Name, Column::Description],
        tabs: &[],
        anchor_id: name_anchor,
    },
    MemberStrategy {
        kind: MemberKind::Property,
        summary_label: "Property Summary",
        details_label: "Property Details",
        default_tab: "Properties",
        name_header: "Property",
        columns: &[Column::Type, Column::Name, Column::Description],
        tabs: &[],
        anchor_id: name_anchor,
    },
    MemberStrategy {
        kind: MemberKind::Field,
        summary_label: "Field Summary",
        details_label: "Field Details",
        default_tab: "Fields",
        name_header: "Field",
        columns: &[Column::ModifierAndType, Column::Name, Column::Description],
        tabs: &[],
        anchor_id: name_anchor,
    },
    MemberStrategy {
        kind: MemberKind::Constructor,
        summary_label: "Constructor Summary",
        details_label: "Constructor Details",
        default_tab: "Constructors",
        name_header: "Constructor",
        columns: &[Column::Modifier, Column::Name, Column::Description],
        tabs: &[],
        anchor_id: executable_anchor,
    },
    MemberStrategy {
        kind: MemberKind::AnnotationElement,
        summary_label: "Annotation Interface Element Summary",
        details_label: "Annotation Interface Element Details",
        default_tab: "Annotation Interface Elements",
        name_header: "Element",
        columns: &[Column::ModifierAndType, Column::Name, Column::Description],
        tabs: &[],
        anchor_id: element_anchor,
    },
    MemberStrategy {
        kind: MemberKind::Method,
        summary_label: "Method Summary",
        details_label: "Method Details",
        default_tab: "All Methods",
        name_header: "Method",
        columns: &[Column::ModifierAndType, Column::Name, Column::Description],
        tabs: METHOD_TABS,
        anchor_id: executable_anchor,
    },
];

impl MemberStrategy {
    pub fn for_kind(kind: MemberKind) -> &'static MemberStrategy {
        match kind {
            MemberKind::EnumConstant => &STRATEGIES[0],
            MemberKind::Property => &STRATEGIES[1],
            MemberKind::Field => &STRATEGIES[2],
            MemberKind::Constructor => &STRATEGIES[3],
            MemberKind::AnnotationElement => &STRATEGIES[4],
            MemberKind::Method => &STRATEGIES[5],
        }
    }

    /// Stable id of the member's detail section.
    pub fn anchor(&self, member: &Member) -> String {
        (self.anchor_id)(member)
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .map(|column| match column {
                Column::ModifierAndType => "Modifier and Type",
                Column::Modifier => "Modifier",
                Column::Type => "Type",
                Column::Name => self.name_header,
                Column::Description => "Description",
            })
            .collect()
    }

    /// Empty summary table with this kind's headers and tabs.
    pub fn summary_table(&self, style: TableStyle) -> TabbedBlock<MemberFacts> {
        let mut block = TabbedBlock::new(style, self.default_tab).with_headers(self.headers());
        for tab in self.tabs {
            block = block.with_tab(tab.label, tab.matches);
        }
        block
    }
}

fn name_anchor(member: &Member) -> String {
    member.name.clone()
}

fn element_anchor(member: &Member) -> String {
    format!("{}()", member.name)
}

/// `name(type,type)` with erased qualified parameter types.
fn executable_anchor(member: &Member) -> String {
    let params: Vec<String> = member.params.iter().map(param_type).collect();
    let anchor = format!("{}({})", member.name, params.join(","));
    anchor.chars().filter(|c| !c.is_whitespace()).collect()
}

fn param_type(param: &Param) -> String {
    let ty = erased_name(&param.ty);
    if !param.varargs {
        return ty;
    }
    match ty.strip_suffix("[]") {
        Some(component) => format!("{component}..."),
        None => format!("{ty}..."),
    }
}

/// Anchor of the member named by a `name` or `name(Type, ...)` reference.
///
/// Parameter types may be simple, partly or fully qualified, may carry type
/// arguments and may be followed by a parameter name. A reference without a
/// parameter list picks the first member of that name. Unresolved
/// references keep their own text, minus whitespace.
pub fn reference_anchor(owner: &TypeDecl, reference: &str) -> String {
    let (name, params) = match reference.split_once('(') {
        Some((name, rest)) => {
            let rest = rest.trim_end();
            (name.trim(), Some(rest.strip_suffix(')').unwrap_or(rest)))
        }
        None => (reference.trim(), None),
    };
    let found = owner.members.iter().find(|member| {
        member.name == name && params.is_none_or(|params| params_match(member, params))
    });
    match found {
        Some(member) => MemberStrategy::for_kind(member.kind).anchor(member),
        None => reference.chars().filter(|c| !c.is_whitespace()).collect(),
    }
}

fn params_match(member: &Member, written: &str) -> bool {
    let written = split_params(written);
    written.len() == member.params.len()
        && member
            .params
            .iter()
            .zip(&written)
            .all(|(param, written)| same_type(&param_type(param), written))
}

/// Split a parameter list on the commas outside type arguments.
fn split_params(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&list[start..]);
    params
}

/// Whether a written parameter, optionally followed by its name, has the
/// erased qualified type `expected`.
fn same_type(expected: &str, written: &str) -> bool {
    let erased = erase_arguments(written);
    let Some(written) = erased.split_whitespace().next() else {
        return false;
    };
    let expected = array_form(expected);
    let written = array_form(written);
    expected == written || expected.ends_with(&format!(".{written}"))
}

/// Varargs and arrays are interchangeable in references.
fn array_form(ty: &str) -> String {
    match ty.strip_suffix("...") {
        Some(component) => format!("{component}[]"),
        None => ty.to_owned(),
    }
}

fn erase_arguments(ty: &str) -> String {
    let mut out = String::with_capacity(ty.len());
    let mut depth = 0usize;
    for c in ty.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn erased_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Declared { name, .. }
        | TypeRef::Variable { name, .. }
        | TypeRef::Primitive { name, .. } => name.clone(),
        TypeRef::Wildcard { .. } => "?".to_owned(),
        TypeRef::Array { component, .. } => format!("{}[]", erased_name(component)),
        TypeRef::Void => "void".to_owned(),
    }
}
