//! Per-class method tables.
//!
//! Catalogs are built in load order so a class's table can start from copies of its supertypes'
//! tables. The resulting `members` map doubles as the override (vtable-like) table used for
//! dynamic dispatch.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use kopi_core::{Diagnostic, DiagnosticKind, Name};
use kopi_hir::{ClassKind, Visibility};
use serde::{Deserialize, Serialize};

use crate::graph::{display_signature_in, ClassEntry, MethodEntry};
use crate::{ClassId, MethodId, Type};

/// Method name plus ordered parameter types. Return type is deliberately not part of it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    pub name: Name,
    pub params: Vec<Type>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassCatalog {
    /// Methods declared by the class itself, grouped by name in declaration order.
    declared: IndexMap<Name, Vec<MethodId>>,
    constructors: Vec<MethodId>,
    /// Every method visible on the class, keyed by signature; the most-derived declaration wins.
    members: BTreeMap<Signature, MethodId>,
}

impl ClassCatalog {
    /// Methods named `name` declared directly by this class.
    #[must_use]
    pub fn declared(&self, name: &str) -> &[MethodId] {
        self.declared.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn declared_names(&self) -> impl Iterator<Item = &Name> {
        self.declared.keys()
    }

    #[must_use]
    pub fn constructors(&self) -> &[MethodId] {
        &self.constructors
    }

    /// The declaration that implements `signature` for instances of this class.
    #[must_use]
    pub fn implementation(&self, signature: &Signature) -> Option<MethodId> {
        self.members.get(signature).copied()
    }

    /// All visible methods named `name`, declared or inherited, in signature order.
    #[must_use]
    pub fn candidates(&self, name: &str) -> Vec<MethodId> {
        self.members
            .iter()
            .filter(|(sig, _)| sig.name == name)
            .map(|(_, id)| *id)
            .collect()
    }

    pub fn members(&self) -> impl Iterator<Item = (&Signature, MethodId)> {
        self.members.iter().map(|(sig, id)| (sig, *id))
    }
}

fn inherit(
    members: &mut BTreeMap<Signature, MethodId>,
    methods: &[MethodEntry],
    signature: &Signature,
    candidate: MethodId,
) {
    if methods[candidate.idx()].visibility == Visibility::Private {
        return;
    }
    match members.get(signature) {
        None => {
            members.insert(signature.clone(), candidate);
        }
        // A concrete implementation beats an abstract one inherited along another path.
        Some(existing)
            if methods[existing.idx()].is_abstract && !methods[candidate.idx()].is_abstract =>
        {
            members.insert(signature.clone(), candidate);
        }
        Some(_) => {}
    }
}

pub(crate) fn build_catalogs(
    classes: &[ClassEntry],
    methods: &[MethodEntry],
    load_order: &[ClassId],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ClassCatalog> {
    let mut catalogs = vec![ClassCatalog::default(); classes.len()];

    for &id in load_order {
        let class = &classes[id.idx()];
        let mut catalog = ClassCatalog::default();

        if let Some(sup) = class.super_class {
            for (sig, method) in &catalogs[sup.idx()].members {
                inherit(&mut catalog.members, methods, sig, *method);
            }
        }
        for iface in &class.interfaces {
            for (sig, method) in &catalogs[iface.idx()].members {
                inherit(&mut catalog.members, methods, sig, *method);
            }
        }

        let mut own: HashMap<Signature, MethodId> = HashMap::new();
        for &mid in &class.methods {
            let method = &methods[mid.idx()];
            if method.has_unresolved_types {
                continue;
            }
            let sig = method.signature();
            if let Some(first) = own.get(&sig) {
                let first = &methods[first.idx()];
                let shown = format!("{}.{}", class.name, display_signature_in(classes, &sig));
                let message = if first.return_ty == method.return_ty {
                    format!("method `{shown}` is already defined")
                } else {
                    format!("method `{shown}` is already defined with a different return type")
                };
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateDefinition,
                    vec![shown],
                    message,
                    method.location,
                ));
                continue;
            }
            own.insert(sig.clone(), mid);
            catalog
                .declared
                .entry(sig.name.clone())
                .or_default()
                .push(mid);
            catalog.members.insert(sig, mid);
        }

        let mut own_ctors: Vec<Vec<Type>> = Vec::new();
        for &mid in &class.constructors {
            let ctor = &methods[mid.idx()];
            if ctor.has_unresolved_types {
                continue;
            }
            if own_ctors.contains(&ctor.params) {
                let shown = format!(
                    "{}.{}",
                    class.name,
                    display_signature_in(classes, &ctor.signature())
                );
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateDefinition,
                    vec![shown.clone()],
                    format!("constructor `{shown}` is already defined"),
                    ctor.location,
                ));
                continue;
            }
            own_ctors.push(ctor.params.clone());
            catalog.constructors.push(mid);
        }

        check_implementation(classes, methods, &catalogs, class, &catalog, diagnostics);
        catalogs[id.idx()] = catalog;
    }

    catalogs
}

fn check_implementation(
    classes: &[ClassEntry],
    methods: &[MethodEntry],
    catalogs: &[ClassCatalog],
    class: &ClassEntry,
    catalog: &ClassCatalog,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if class.kind == ClassKind::Interface {
        return;
    }

    for (sig, mid) in &catalog.members {
        let method = &methods[mid.idx()];
        if !method.is_abstract {
            continue;
        }
        let shown = format!(
            "{}.{}",
            classes[method.owner.idx()].name,
            display_signature_in(classes, sig)
        );

        if !class.is_abstract {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingImplementation,
                vec![class.name.to_string(), shown.clone()],
                format!(
                    "`{}` is not abstract and does not implement `{shown}`",
                    class.name
                ),
                class.location,
            ));
            continue;
        }

        // Only the abstract class that first takes on the interface obligation is told about it.
        let owner_is_interface = classes[method.owner.idx()].kind == ClassKind::Interface;
        let inherited_from_super = class
            .super_class
            .is_some_and(|sup| catalogs[sup.idx()].members.contains_key(sig));
        if owner_is_interface && !inherited_from_super {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnimplementedInterfaceMethod,
                vec![class.name.to_string(), shown.clone()],
                format!(
                    "abstract class `{}` leaves interface method `{shown}` unimplemented",
                    class.name
                ),
                class.location,
            ));
        }
    }
}
