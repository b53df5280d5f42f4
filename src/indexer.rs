//! Package indexing: import aliases, controller handlers and controller docs.
//!
//! The entry router refers to controllers through the modules it imports. For every imported
//! package the indexer locates its source through a [`PackageResolver`], parses every file and
//! records two tables keyed by the controller's qualified name (`package::Type`):
//!
//! - the handler entries built from the doc comments of the controller's methods
//! - the doc comment of the controller's `pub struct` declaration

use crate::annotation::{build_handler, normalize_line};
use crate::error::{Error, Result};
use crate::parser::{doc_lines, doc_text, AstParser};
use crate::resolver::PackageResolver;
use crate::scanner::FileScanner;
use crate::swagger::Api;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use syn::visit::{self, Visit};
use syn::{ImplItem, ItemImpl, ItemStruct, Type, UseTree, Visibility};

/// Crates that are never looked up on the search path
const STANDARD_CRATES: [&str; 3] = ["std", "core", "alloc"];

/// What an import alias of the entry file stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// `use myapp::controllers;`
    Module { package: String },
    /// `use myapp::controllers::UserController;`
    Type { package: String, type_name: String },
    /// `use myapp::filters::auth_filter;`, a function, macro or constant of a package
    Item { package: String, name: String },
}

impl ImportTarget {
    pub fn package(&self) -> &str {
        match self {
            ImportTarget::Module { package }
            | ImportTarget::Type { package, .. }
            | ImportTarget::Item { package, .. } => package,
        }
    }
}

/// Builds the table key for a controller type declared in `package`.
pub fn qualified_name(package: &str, type_name: &str) -> String {
    format!("{}::{}", package, type_name)
}

/// Per-run tables filled while scanning imported packages.
#[derive(Debug)]
pub struct PackageIndex {
    framework_root: String,
    strict: bool,
    package_cache: HashSet<String>,
    imports: HashMap<String, ImportTarget>,
    handlers: HashMap<String, Vec<Api>>,
    controller_docs: HashMap<String, String>,
}

impl PackageIndex {
    /// Creates an empty index. Packages under `framework_root` are never scanned.
    pub fn new(framework_root: impl Into<String>) -> Self {
        Self {
            framework_root: framework_root.into(),
            strict: false,
            package_cache: HashSet::new(),
            imports: HashMap::new(),
            handlers: HashMap::new(),
            controller_docs: HashMap::new(),
        }
    }

    /// Warn about doc-commented methods that are dropped for lacking a route.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Records the aliases of every `use` in `file` and indexes the packages they name.
    ///
    /// # Errors
    ///
    /// Fails on the first package that cannot be resolved or parsed.
    pub fn index_imports(&mut self, file: &syn::File, resolver: &dyn PackageResolver) -> Result<()> {
        let mut leaves = Vec::new();
        for item in &file.items {
            if let syn::Item::Use(item_use) = item {
                flatten_use_tree(&item_use.tree, Vec::new(), &mut leaves);
            }
        }

        for (segments, alias) in leaves {
            let Some(target) = import_target(segments) else {
                continue;
            };
            let target = self.locate_item(target, resolver);
            let package = target.package().to_string();
            let is_item = matches!(target, ImportTarget::Item { .. });
            self.register_import(alias, target);
            if !is_item {
                self.index_package(&package, resolver)?;
            }
        }
        Ok(())
    }

    /// Reclassifies a lower-case import that is not a package as an item of its parent.
    ///
    /// The import is left as a module when the parent does not resolve either, so the
    /// missing package is reported under its full path.
    fn locate_item(&self, target: ImportTarget, resolver: &dyn PackageResolver) -> ImportTarget {
        let ImportTarget::Module { package } = target else {
            return target;
        };
        if self.is_skipped(&package)
            || self.package_cache.contains(&package)
            || resolver.resolve(&package).is_some()
        {
            return ImportTarget::Module { package };
        }
        match package.rsplit_once("::") {
            Some((parent, name))
                if self.package_cache.contains(parent) || resolver.resolve(parent).is_some() =>
            {
                debug!("{} is an item of package {}", name, parent);
                ImportTarget::Item {
                    package: parent.to_string(),
                    name: name.to_string(),
                }
            }
            _ => ImportTarget::Module { package },
        }
    }

    fn is_skipped(&self, package: &str) -> bool {
        let root = package.split("::").next().unwrap_or_default();
        root == self.framework_root || STANDARD_CRATES.contains(&root)
    }

    /// Scans one package unless it was already scanned or belongs to the framework.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if the resolver cannot locate the package and
    /// [`Error::ParseError`] if one of its files is not valid Rust.
    pub fn index_package(&mut self, package: &str, resolver: &dyn PackageResolver) -> Result<()> {
        if self.is_skipped(package) || self.package_cache.contains(package) {
            return Ok(());
        }

        let location = resolver.resolve(package).ok_or_else(|| Error::PackageNotFound {
            package: package.to_string(),
        })?;
        info!("Indexing package {} at {}", package, location.display());

        let scan = FileScanner::new(location).scan()?;
        let parsed = AstParser::parse_files(&scan.rust_files)?;
        for file in &parsed {
            self.index_file(package, &file.syntax_tree);
        }

        self.package_cache.insert(package.to_string());
        Ok(())
    }

    /// Collects handlers and controller docs from one parsed file of `package`.
    pub fn index_file(&mut self, package: &str, file: &syn::File) {
        let mut visitor = PackageVisitor {
            package,
            index: self,
        };
        visitor.visit_file(file);
    }

    fn add_handler(&mut self, package: &str, type_name: &str, handler: Api) {
        self.handlers
            .entry(qualified_name(package, type_name))
            .or_default()
            .push(handler);
    }

    /// Records what `alias` stands for in the entry file. A later import of the same alias wins.
    pub fn register_import(&mut self, alias: impl Into<String>, target: ImportTarget) {
        let alias = alias.into();
        debug!("Import {} -> {:?}", alias, target);
        self.imports.insert(alias, target);
    }

    pub fn import(&self, alias: &str) -> Option<&ImportTarget> {
        self.imports.get(alias)
    }

    pub fn handlers(&self, controller: &str) -> Option<&[Api]> {
        self.handlers.get(controller).map(Vec::as_slice)
    }

    pub fn controller_doc(&self, controller: &str) -> Option<&str> {
        self.controller_docs.get(controller).map(String::as_str)
    }

    pub fn is_indexed(&self, package: &str) -> bool {
        self.package_cache.contains(package)
    }

    /// Resolves a controller type path written in the entry file to its qualified name.
    ///
    /// `UserController` must be a type import; `controllers::UserController` goes through the
    /// alias of its first segment, or failing that through its literal parent path when that
    /// package has been indexed.
    pub fn resolve_controller(&self, segments: &[String]) -> Option<String> {
        let (type_name, parents) = segments.split_last()?;
        match parents {
            [] => match self.imports.get(type_name)? {
                ImportTarget::Type { package, type_name } => {
                    Some(qualified_name(package, type_name))
                }
                ImportTarget::Module { .. } | ImportTarget::Item { .. } => None,
            },
            [first, ..] => match self.imports.get(first) {
                Some(ImportTarget::Module { package }) => Some(qualified_name(package, type_name)),
                Some(ImportTarget::Type { .. } | ImportTarget::Item { .. }) => None,
                None => {
                    let package = parents.join("::");
                    self.is_indexed(&package)
                        .then(|| qualified_name(&package, type_name))
                }
            },
        }
    }
}

/// Walks one file and feeds the index.
struct PackageVisitor<'a> {
    package: &'a str,
    index: &'a mut PackageIndex,
}

impl<'ast> Visit<'ast> for PackageVisitor<'_> {
    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        let Some(type_name) = self_type_name(&node.self_ty) else {
            return;
        };

        for item in &node.items {
            let ImplItem::Fn(method) = item else {
                continue;
            };
            let by_reference = method.sig.receiver().is_some_and(|receiver| {
                receiver.reference.is_some() || matches!(*receiver.ty, Type::Reference(_))
            });
            if !by_reference {
                continue;
            }

            let lines = doc_lines(&method.attrs);
            let handler = build_handler(lines.iter().map(String::as_str));
            if handler.path.is_empty() {
                if self.index.strict && lines.iter().any(|l| normalize_line(l).starts_with('@')) {
                    warn!(
                        "{}::{}::{} has annotations but no @router, dropped",
                        self.package, type_name, method.sig.ident
                    );
                }
                continue;
            }
            debug!(
                "Handler {}::{} {} {}",
                type_name,
                method.sig.ident,
                handler.operations[0].http_method,
                handler.path
            );
            self.index.add_handler(self.package, &type_name, handler);
        }
    }

    fn visit_item_struct(&mut self, node: &'ast ItemStruct) {
        // `pub(crate)` controllers are still reachable from the router
        if !matches!(node.vis, Visibility::Inherited) {
            self.index.controller_docs.insert(
                qualified_name(self.package, &node.ident.to_string()),
                doc_text(&node.attrs),
            );
        }
        visit::visit_item_struct(self, node);
    }
}

fn self_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// Expands a use tree into `(path segments, alias)` leaves. Glob imports produce nothing.
fn flatten_use_tree(tree: &UseTree, prefix: Vec<String>, out: &mut Vec<(Vec<String>, String)>) {
    match tree {
        UseTree::Path(path) => {
            let mut prefix = prefix;
            prefix.push(path.ident.to_string());
            flatten_use_tree(&path.tree, prefix, out);
        }
        UseTree::Name(name) if name.ident == "self" => {
            if let Some(last) = prefix.last().cloned() {
                out.push((prefix, last));
            }
        }
        UseTree::Name(name) => {
            let mut segments = prefix;
            segments.push(name.ident.to_string());
            out.push((segments, name.ident.to_string()));
        }
        UseTree::Rename(rename) => {
            let mut segments = prefix;
            segments.push(rename.ident.to_string());
            out.push((segments, rename.rename.to_string()));
        }
        UseTree::Group(group) => {
            for item in &group.items {
                flatten_use_tree(item, prefix.clone(), out);
            }
        }
        UseTree::Glob(_) => {}
    }
}

/// Classifies an imported path as a module or a type import.
///
/// A leading `super` is read as the crate root, where controller modules live.
fn import_target(mut segments: Vec<String>) -> Option<ImportTarget> {
    if segments.first().map(String::as_str) == Some("super") {
        segments[0] = "crate".to_string();
    }
    let last = segments.last()?;
    if last.chars().next().is_some_and(char::is_uppercase) {
        let (type_name, parents) = segments.split_last()?;
        if parents.is_empty() {
            return None;
        }
        return Some(ImportTarget::Type {
            package: parents.join("::"),
            type_name: type_name.clone(),
        });
    }
    Some(ImportTarget::Module {
        package: segments.join("::"),
    })
}
