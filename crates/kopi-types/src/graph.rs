use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use kopi_core::{split_qualified, Diagnostic, DiagnosticKind, FileId, Name, SourceLoc, Span};
use kopi_hir::{Body, ClassDecl, ClassKind, CompilationUnit, ExprId, MethodKind, TypeExpr, Visibility};

use crate::catalog::{build_catalogs, ClassCatalog, Signature};
use crate::jdk::{bootstrap_units, BOOTSTRAP_FILE};
use crate::{ClassId, FieldId, MethodId, Type};

/// Knobs for [`build_class_graph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphOptions {
    /// Inject the minimal `java.lang` classes (see [`crate::bootstrap_units`]).
    pub bootstrap_jdk: bool,
    /// Qualified names of the roots of the unchecked throwable hierarchy.
    pub unchecked_roots: Vec<String>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            bootstrap_jdk: true,
            unchecked_roots: vec![
                "java.lang.RuntimeException".to_string(),
                "java.lang.Error".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UnitScope {
    file: FileId,
    package: Option<Name>,
    imports: Vec<Name>,
}

#[derive(Debug, Clone)]
pub struct ClassEntry {
    pub id: ClassId,
    /// Fully qualified name (`java.lang.Object`, or the simple name in the default package).
    pub name: Name,
    pub simple_name: Name,
    pub kind: ClassKind,
    pub is_abstract: bool,
    pub super_class: Option<ClassId>,
    /// Declaration order is preserved for diagnostics.
    pub interfaces: Vec<ClassId>,
    /// Declaration order.
    pub fields: Vec<FieldId>,
    /// Declared methods (constructors excluded), declaration order.
    pub methods: Vec<MethodId>,
    pub constructors: Vec<MethodId>,
    /// Arena the fields' initializer expressions point into.
    pub initializers: Body,
    pub location: Option<SourceLoc>,
    scope: usize,
}

impl ClassEntry {
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Direct supertypes: superclass first, then interfaces in declaration order.
    #[must_use]
    pub fn supertypes(&self) -> Vec<ClassId> {
        let mut out: Vec<ClassId> = self.super_class.into_iter().collect();
        for iface in &self.interfaces {
            if !out.contains(iface) {
                out.push(*iface);
            }
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub id: FieldId,
    pub owner: ClassId,
    pub name: Name,
    pub ty: Type,
    pub visibility: Visibility,
    pub is_static: bool,
    pub initializer: Option<ExprId>,
    pub location: Option<SourceLoc>,
}

#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub id: MethodId,
    pub owner: ClassId,
    pub name: Name,
    pub kind: MethodKind,
    pub params: Vec<Type>,
    /// `None` for constructors.
    pub return_ty: Option<Type>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    /// Declared checked-exception types.
    pub throws: Vec<ClassId>,
    pub body: Option<Body>,
    /// Synthesized default constructor.
    pub is_implicit: bool,
    pub location: Option<SourceLoc>,
    /// Some signature type failed to resolve; the method is excluded from the catalog.
    pub has_unresolved_types: bool,
}

impl MethodEntry {
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature {
            name: self.name.clone(),
            params: self.params.clone(),
        }
    }

    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    /// Whether a call through this method's signature goes through the override table.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        !self.is_static && !self.is_constructor() && self.visibility != Visibility::Private
    }
}

/// Frequently needed `java.lang` classes (absent when neither bootstrap nor input supplies them).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: Option<ClassId>,
    pub string: Option<ClassId>,
    pub throwable: Option<ClassId>,
    pub exception: Option<ClassId>,
    pub runtime_exception: Option<ClassId>,
    pub error: Option<ClassId>,
    pub null_pointer_exception: Option<ClassId>,
    pub arithmetic_exception: Option<ClassId>,
}

/// The fully linked, immutable class/interface graph.
#[derive(Debug, Clone)]
pub struct ClassGraph {
    classes: Vec<ClassEntry>,
    fields: Vec<FieldEntry>,
    methods: Vec<MethodEntry>,
    scopes: Vec<UnitScope>,
    by_name: HashMap<Name, ClassId>,
    /// Reflexive-transitive supertypes per class.
    ancestors: Vec<BTreeSet<ClassId>>,
    catalogs: Vec<ClassCatalog>,
    load_order: Vec<ClassId>,
    well_known: WellKnownTypes,
    unchecked_roots: Vec<ClassId>,
}

#[derive(Debug)]
pub struct GraphBuild {
    pub graph: ClassGraph,
    pub diagnostics: Vec<Diagnostic>,
}

fn location(file: FileId, span: Span) -> Option<SourceLoc> {
    (file != BOOTSTRAP_FILE).then(|| SourceLoc::new(file, span))
}

fn qualify(package: Option<&Name>, simple: &str) -> Name {
    match package {
        Some(pkg) if !pkg.is_empty() => Name::new(format!("{pkg}.{simple}")),
        _ => Name::new(simple),
    }
}

fn lookup_in_scope(
    by_name: &HashMap<Name, ClassId>,
    scope: &UnitScope,
    name: &str,
) -> Option<ClassId> {
    if name.contains('.') {
        return by_name.get(name).copied();
    }

    for import in &scope.imports {
        if split_qualified(import).1 == name {
            if let Some(id) = by_name.get(import.as_str()) {
                return Some(*id);
            }
        }
    }

    let local = qualify(scope.package.as_ref(), name);
    if let Some(id) = by_name.get(local.as_str()) {
        return Some(*id);
    }

    by_name.get(format!("java.lang.{name}").as_str()).copied()
}

fn resolve_in_scope(
    by_name: &HashMap<Name, ClassId>,
    scope: &UnitScope,
    ty: &TypeExpr,
) -> Result<Type, Name> {
    match ty {
        TypeExpr::Primitive(p) => Ok(Type::Primitive(*p)),
        TypeExpr::Void => Ok(Type::Void),
        TypeExpr::Named(name) => lookup_in_scope(by_name, scope, name)
            .map(Type::Class)
            .ok_or_else(|| name.clone()),
    }
}

struct Pending {
    qualified: Name,
    scope: usize,
    ordinal: usize,
    decl: ClassDecl,
}

/// Build the class graph from every compilation unit, in any order.
///
/// Pass 1 registers every declaration under its qualified name; pass 2 resolves every type
/// reference against that table, so a subclass may be ingested before its superclass. Class ids
/// are assigned in qualified-name order, which makes the resulting graph independent of the
/// ingestion order.
pub fn build_class_graph(units: Vec<CompilationUnit>, options: &GraphOptions) -> GraphBuild {
    let mut diagnostics = Vec::new();

    let mut units = units;
    if options.bootstrap_jdk {
        units.extend(bootstrap_units());
    }

    // === pass 1: registration ===

    let mut scopes = Vec::with_capacity(units.len());
    let mut pending = Vec::new();
    for unit in units {
        let scope = scopes.len();
        scopes.push(UnitScope {
            file: unit.file,
            package: unit.package.clone(),
            imports: unit.imports.clone(),
        });
        for (ordinal, decl) in unit.classes.into_iter().enumerate() {
            pending.push(Pending {
                qualified: qualify(unit.package.as_ref(), &decl.name),
                scope,
                ordinal,
                decl,
            });
        }
    }

    // Bootstrap declarations carry the largest file id, so user input wins name clashes.
    pending.sort_by(|a, b| {
        a.qualified
            .cmp(&b.qualified)
            .then_with(|| scopes[a.scope].file.cmp(&scopes[b.scope].file))
            .then_with(|| a.decl.span.cmp(&b.decl.span))
            .then_with(|| a.ordinal.cmp(&b.ordinal))
    });

    let mut registered: Vec<Pending> = Vec::with_capacity(pending.len());
    for candidate in pending {
        if let Some(kept) = registered.last() {
            if kept.qualified == candidate.qualified {
                let file = scopes[candidate.scope].file;
                if file != BOOTSTRAP_FILE {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::DuplicateDefinition,
                        vec![candidate.qualified.to_string()],
                        format!("type `{}` is defined more than once", candidate.qualified),
                        location(file, candidate.decl.span),
                    ));
                }
                continue;
            }
        }
        registered.push(candidate);
    }

    let by_name: HashMap<Name, ClassId> = registered
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.qualified.clone(), ClassId::new(idx)))
        .collect();
    tracing::debug!(
        target: "kopi.types",
        classes = registered.len(),
        "registered class declarations"
    );

    let object = by_name.get("java.lang.Object").copied();

    // === pass 2: reference resolution ===

    let mut classes = Vec::with_capacity(registered.len());
    let mut fields = Vec::new();
    let mut methods = Vec::new();

    for (idx, p) in registered.into_iter().enumerate() {
        let id = ClassId::new(idx);
        let scope = &scopes[p.scope];
        let file = scope.file;
        let decl = p.decl;
        let class_loc = location(file, decl.span);

        let unresolved = |missing: &Name, span: Span, diagnostics: &mut Vec<Diagnostic>| {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnresolvedType,
                vec![missing.to_string(), p.qualified.to_string()],
                format!("cannot resolve type `{missing}` referenced from `{}`", p.qualified),
                location(file, span),
            ));
        };

        let mut super_class = match &decl.super_class {
            Some(ty) => match resolve_in_scope(&by_name, scope, ty) {
                Ok(Type::Class(sup)) => Some(sup),
                Ok(_) => None,
                Err(missing) => {
                    unresolved(&missing, decl.span, &mut diagnostics);
                    None
                }
            },
            None => None,
        };
        if super_class.is_none() && decl.kind == ClassKind::Class && Some(id) != object {
            super_class = object;
        }

        let mut interfaces = Vec::new();
        for ty in &decl.interfaces {
            match resolve_in_scope(&by_name, scope, ty) {
                Ok(Type::Class(iface)) => interfaces.push(iface),
                Ok(_) => {}
                Err(missing) => unresolved(&missing, decl.span, &mut diagnostics),
            }
        }

        let mut field_ids = Vec::with_capacity(decl.fields.len());
        for field in decl.fields {
            let ty = resolve_in_scope(&by_name, scope, &field.ty).unwrap_or_else(|missing| {
                unresolved(&missing, field.span, &mut diagnostics);
                Type::Unknown
            });
            let fid = FieldId::new(fields.len());
            fields.push(FieldEntry {
                id: fid,
                owner: id,
                name: field.name,
                ty,
                visibility: field.visibility,
                is_static: field.is_static,
                initializer: field.initializer,
                location: location(file, field.span),
            });
            field_ids.push(fid);
        }

        let mut method_ids = Vec::new();
        let mut ctor_ids = Vec::new();
        for method in decl.methods {
            let mut has_unresolved_types = false;
            let mut resolve = |ty: &TypeExpr, diagnostics: &mut Vec<Diagnostic>| {
                resolve_in_scope(&by_name, scope, ty).unwrap_or_else(|missing| {
                    unresolved(&missing, method.span, diagnostics);
                    has_unresolved_types = true;
                    Type::Unknown
                })
            };

            let params: Vec<Type> = method
                .params
                .iter()
                .map(|param| resolve(&param.ty, &mut diagnostics))
                .collect();
            let return_ty = method
                .return_ty
                .as_ref()
                .map(|ty| resolve(ty, &mut diagnostics));
            let throws: Vec<ClassId> = method
                .throws
                .iter()
                .filter_map(|ty| resolve(ty, &mut diagnostics).as_class())
                .collect();

            let mid = MethodId::new(methods.len());
            let is_constructor = method.kind == MethodKind::Constructor;
            methods.push(MethodEntry {
                id: mid,
                owner: id,
                name: if is_constructor {
                    decl.name.clone()
                } else {
                    method.name
                },
                kind: method.kind,
                params,
                return_ty,
                visibility: method.visibility,
                is_static: method.is_static && !is_constructor,
                is_abstract: method.is_abstract
                    || (decl.kind == ClassKind::Interface && method.body.is_none()),
                throws,
                body: method.body,
                is_implicit: false,
                location: location(file, method.span),
                has_unresolved_types,
            });
            if is_constructor {
                ctor_ids.push(mid);
            } else {
                method_ids.push(mid);
            }
        }

        if decl.kind == ClassKind::Class && ctor_ids.is_empty() {
            let mid = MethodId::new(methods.len());
            methods.push(MethodEntry {
                id: mid,
                owner: id,
                name: decl.name.clone(),
                kind: MethodKind::Constructor,
                params: Vec::new(),
                return_ty: None,
                visibility: Visibility::Public,
                is_static: false,
                is_abstract: false,
                throws: Vec::new(),
                body: None,
                is_implicit: true,
                location: class_loc,
                has_unresolved_types: false,
            });
            ctor_ids.push(mid);
        }

        classes.push(ClassEntry {
            id,
            name: p.qualified,
            simple_name: decl.name,
            kind: decl.kind,
            is_abstract: decl.is_abstract || decl.kind == ClassKind::Interface,
            super_class,
            interfaces,
            fields: field_ids,
            methods: method_ids,
            constructors: ctor_ids,
            initializers: decl.initializers,
            location: class_loc,
            scope: p.scope,
        });
    }

    break_cycles(&mut classes, object, &mut diagnostics);

    let load_order = topological_order(&classes);
    let ancestors = compute_ancestors(&classes, &load_order, object);
    let catalogs = build_catalogs(&classes, &methods, &load_order, &mut diagnostics);

    let well_known = {
        let get = |name: &str| by_name.get(name).copied();
        WellKnownTypes {
            object,
            string: get("java.lang.String"),
            throwable: get("java.lang.Throwable"),
            exception: get("java.lang.Exception"),
            runtime_exception: get("java.lang.RuntimeException"),
            error: get("java.lang.Error"),
            null_pointer_exception: get("java.lang.NullPointerException"),
            arithmetic_exception: get("java.lang.ArithmeticException"),
        }
    };
    let unchecked_roots = options
        .unchecked_roots
        .iter()
        .filter_map(|name| by_name.get(name.as_str()).copied())
        .collect();

    GraphBuild {
        graph: ClassGraph {
            classes,
            fields,
            methods,
            scopes,
            by_name,
            ancestors,
            catalogs,
            load_order,
            well_known,
            unchecked_roots,
        },
        diagnostics,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Detect supertype cycles with a depth-first walk and cut the edge closing each cycle.
fn break_cycles(classes: &mut [ClassEntry], object: Option<ClassId>, diagnostics: &mut Vec<Diagnostic>) {
    let mut marks = vec![Mark::Unvisited; classes.len()];

    for start in 0..classes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        // (class, index of the next supertype edge to follow)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::Visiting;

        while let Some(&(node, edge)) = stack.last() {
            let top = stack.len() - 1;
            let supers = classes[node].supertypes();
            let Some(&next) = supers.get(edge) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };

            match marks[next.idx()] {
                Mark::Done => stack[top].1 += 1,
                Mark::Unvisited => {
                    stack[top].1 += 1;
                    marks[next.idx()] = Mark::Visiting;
                    stack.push((next.idx(), 0));
                }
                Mark::Visiting => {
                    let from = stack
                        .iter()
                        .position(|(n, _)| *n == next.idx())
                        .unwrap_or(0);
                    let mut members: Vec<String> = stack[from..]
                        .iter()
                        .map(|(n, _)| classes[*n].name.to_string())
                        .collect();
                    members.sort();

                    tracing::warn!(
                        target: "kopi.types",
                        class = %classes[node].name,
                        cycle = ?members,
                        "breaking inheritance cycle"
                    );
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::InheritanceCycle,
                        members.clone(),
                        format!("cyclic inheritance involving {}", members.join(", ")),
                        classes[node].location,
                    ));

                    // Removing the edge shifts the remaining edges down, so `edge` stays put.
                    let entry = &mut classes[node];
                    if entry.super_class == Some(next) {
                        entry.super_class = match object {
                            Some(object) if object != entry.id && object != next => Some(object),
                            _ => None,
                        };
                    } else {
                        entry.interfaces.retain(|iface| *iface != next);
                    }
                }
            }
        }
    }
}

/// Supertypes before subtypes; ties broken by class id, i.e. by qualified name.
fn topological_order(classes: &[ClassEntry]) -> Vec<ClassId> {
    let mut indegree: Vec<usize> = classes.iter().map(|c| c.supertypes().len()).collect();
    let mut subtypes: Vec<Vec<ClassId>> = vec![Vec::new(); classes.len()];
    for class in classes {
        for sup in class.supertypes() {
            subtypes[sup.idx()].push(class.id);
        }
    }

    let mut ready: BinaryHeap<Reverse<ClassId>> = classes
        .iter()
        .filter(|c| indegree[c.id.idx()] == 0)
        .map(|c| Reverse(c.id))
        .collect();

    let mut order = Vec::with_capacity(classes.len());
    while let Some(Reverse(id)) = ready.pop() {
        order.push(id);
        for &sub in &subtypes[id.idx()] {
            indegree[sub.idx()] -= 1;
            if indegree[sub.idx()] == 0 {
                ready.push(Reverse(sub));
            }
        }
    }
    order
}

fn compute_ancestors(
    classes: &[ClassEntry],
    load_order: &[ClassId],
    object: Option<ClassId>,
) -> Vec<BTreeSet<ClassId>> {
    let mut ancestors: Vec<BTreeSet<ClassId>> = vec![BTreeSet::new(); classes.len()];
    for &id in load_order {
        let class = &classes[id.idx()];
        let mut set = BTreeSet::new();
        set.insert(id);
        for sup in class.supertypes() {
            set.extend(ancestors[sup.idx()].iter().copied());
        }
        // Every interface is a subtype of `Object`.
        if class.is_interface() {
            set.extend(object);
        }
        ancestors[id.idx()] = set;
    }
    ancestors
}

impl ClassGraph {
    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassEntry {
        &self.classes[id.idx()]
    }

    #[must_use]
    pub fn field(&self, id: FieldId) -> &FieldEntry {
        &self.fields[id.idx()]
    }

    #[must_use]
    pub fn method(&self, id: MethodId) -> &MethodEntry {
        &self.methods[id.idx()]
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.classes.iter()
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodEntry> {
        self.methods.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Look up a class by fully qualified name.
    #[must_use]
    pub fn lookup_class(&self, qualified: &str) -> Option<ClassId> {
        self.by_name.get(qualified).copied()
    }

    /// Resolve a source type reference as written inside `context`'s compilation unit.
    #[must_use]
    pub fn resolve_type_in(&self, context: ClassId, ty: &TypeExpr) -> Option<Type> {
        let scope = &self.scopes[self.class(context).scope];
        resolve_in_scope(&self.by_name, scope, ty).ok()
    }

    /// The file a class was declared in (`None` for bootstrap classes).
    #[must_use]
    pub fn file_of(&self, class: ClassId) -> Option<FileId> {
        let file = self.scopes[self.class(class).scope].file;
        (file != BOOTSTRAP_FILE).then_some(file)
    }

    #[must_use]
    pub fn catalog(&self, id: ClassId) -> &ClassCatalog {
        &self.catalogs[id.idx()]
    }

    /// Every class with its supertypes first; ties broken by qualified name.
    #[must_use]
    pub fn load_order(&self) -> &[ClassId] {
        &self.load_order
    }

    #[must_use]
    pub fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    /// Reflexive-transitive supertypes of `id`.
    #[must_use]
    pub fn ancestors(&self, id: ClassId) -> &BTreeSet<ClassId> {
        &self.ancestors[id.idx()]
    }

    #[must_use]
    pub fn is_throwable(&self, id: ClassId) -> bool {
        self.well_known
            .throwable
            .is_some_and(|throwable| self.ancestors(id).contains(&throwable))
    }

    /// Unchecked throwables are those reachable from a designated unchecked root.
    #[must_use]
    pub fn is_unchecked(&self, id: ClassId) -> bool {
        self.unchecked_roots
            .iter()
            .any(|root| self.ancestors(id).contains(root))
    }

    /// Nearest field named `name`, searching `class`, then its superclass chain, then interfaces.
    ///
    /// A subclass field shadows a superclass field of the same name; both keep their own slot.
    #[must_use]
    pub fn lookup_field(&self, class: ClassId, name: &str) -> Option<FieldId> {
        let mut current = Some(class);
        while let Some(id) = current {
            let entry = self.class(id);
            if let Some(field) = entry
                .fields
                .iter()
                .copied()
                .find(|f| self.field(*f).name == name)
            {
                return Some(field);
            }
            current = entry.super_class;
        }

        self.ancestors(class)
            .iter()
            .filter(|id| self.class(**id).is_interface())
            .flat_map(|id| self.class(*id).fields.iter().copied())
            .find(|f| self.field(*f).name == name)
    }

    /// Every instance field an object of `class` carries, root class first.
    #[must_use]
    pub fn instance_layout(&self, class: ClassId) -> Vec<FieldId> {
        let mut chain = Vec::new();
        let mut current = Some(class);
        while let Some(id) = current {
            chain.push(id);
            current = self.class(id).super_class;
        }
        chain
            .iter()
            .rev()
            .flat_map(|id| self.class(*id).fields.iter().copied())
            .filter(|f| !self.field(*f).is_static)
            .collect()
    }

    /// Dynamic dispatch: the body that runs for `method` on an instance of `runtime_class`.
    ///
    /// This is a single lookup in the runtime class's override table, not a specificity ranking.
    #[must_use]
    pub fn dispatch(&self, runtime_class: ClassId, method: MethodId) -> MethodId {
        let entry = self.method(method);
        if !entry.is_virtual() {
            return method;
        }
        match self.catalog(runtime_class).implementation(&entry.signature()) {
            Some(target) if !self.method(target).is_abstract => target,
            _ => method,
        }
    }

    #[must_use]
    pub fn display_type(&self, ty: &Type) -> String {
        display_type_in(&self.classes, ty)
    }

    #[must_use]
    pub fn display_signature(&self, signature: &Signature) -> String {
        display_signature_in(&self.classes, signature)
    }

    /// `Owner.name(ParamTypes)`, e.g. `DispatchTest.test(DispatchClass1)`.
    #[must_use]
    pub fn display_method(&self, id: MethodId) -> String {
        let method = self.method(id);
        format!(
            "{}.{}",
            self.class(method.owner).name,
            self.display_signature(&method.signature())
        )
    }
}

pub(crate) fn display_type_in(classes: &[ClassEntry], ty: &Type) -> String {
    match ty {
        Type::Primitive(p) => p.keyword().to_string(),
        Type::Class(id) => classes[id.idx()].name.to_string(),
        Type::Null => "null".to_string(),
        Type::Void => "void".to_string(),
        Type::Unknown => "<unknown>".to_string(),
    }
}

pub(crate) fn display_signature_in(classes: &[ClassEntry], signature: &Signature) -> String {
    let params: Vec<String> = signature
        .params
        .iter()
        .map(|p| display_type_in(classes, p))
        .collect();
    format!("{}({})", signature.name, params.join(", "))
}
