//! Route registration discovery in the entry router file.
//!
//! The router registers its controllers through nested namespace calls:
//!
//! ```ignore
//! let ns = new_namespace(
//!     "/v1",
//!     ns_namespace("/object", ns_include(&controllers::ObjectController {})),
//!     ns_namespace("/user", ns_include(&controllers::UserController {})),
//! );
//! ```
//!
//! Only these call shapes are understood. Anything else is skipped without a diagnostic
//! (unless strict mode asks for warnings).

use crate::annotation::build_root_info;
use crate::indexer::PackageIndex;
use crate::parser::doc_lines;
use crate::swagger::ResourceListing;
use log::{debug, warn};
use syn::punctuated::Punctuated;
use syn::{Expr, ExprCall, Item, Lit, Stmt, Token};

/// Callee that starts a namespace tree
pub const NEW_NAMESPACE: &str = "new_namespace";
/// Callee of a nested namespace option
pub const NS_NAMESPACE: &str = "ns_namespace";
/// Callee attaching controllers to the enclosing namespace
pub const NS_INCLUDE: &str = "ns_include";

/// One segment of the registered path hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceNode {
    /// Path literal exactly as written, possibly empty
    pub base_path: String,
    pub children: Vec<NamespaceNode>,
    /// Qualified names of the controllers included directly at this level
    pub controllers: Vec<String>,
}

/// Recognized shapes of a namespace option.
enum NamespaceOption<'a> {
    Namespace(&'a ExprCall),
    Include(&'a ExprCall),
    Other,
}

/// Walks the entry file, resolving controller references through `index`.
pub struct NamespaceResolver<'a> {
    index: &'a PackageIndex,
    strict: bool,
}

/// Reads the API-wide directives from the entry file's `//!` comment.
pub fn root_info(file: &syn::File) -> ResourceListing {
    let lines = doc_lines(&file.attrs);
    build_root_info(lines.iter().map(String::as_str))
}

fn callee_name(call: &ExprCall) -> Option<String> {
    match &*call.func {
        Expr::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(s) => Some(s.value()),
            _ => None,
        },
        _ => None,
    }
}

/// Spreads array literals, references to them and `vec![...]` into individual options.
fn flatten_options(args: impl Iterator<Item = Expr>, out: &mut Vec<Expr>) {
    for arg in args {
        match arg {
            Expr::Array(array) => flatten_options(array.elems.into_iter(), out),
            Expr::Reference(reference) if matches!(*reference.expr, Expr::Array(_)) => {
                flatten_options(std::iter::once(*reference.expr), out)
            }
            Expr::Macro(mac) if mac.mac.path.is_ident("vec") => {
                match mac
                    .mac
                    .parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
                {
                    Ok(elems) => flatten_options(elems.into_iter(), out),
                    Err(e) => debug!("Skipping unparsable vec! option: {}", e),
                }
            }
            other => out.push(other),
        }
    }
}

/// Splits a namespace call into its base path literal and its options.
pub fn split_namespace_call(call: &ExprCall) -> (String, Vec<Expr>) {
    let mut args = call.args.iter();
    let base_path = args.next().and_then(string_literal).unwrap_or_default();
    let mut options = Vec::new();
    flatten_options(args.cloned(), &mut options);
    (base_path, options)
}

fn classify(expr: &Expr) -> NamespaceOption<'_> {
    let Expr::Call(call) = expr else {
        return NamespaceOption::Other;
    };
    match callee_name(call).as_deref() {
        Some(NS_NAMESPACE) => NamespaceOption::Namespace(call),
        Some(NS_INCLUDE) => NamespaceOption::Include(call),
        _ => NamespaceOption::Other,
    }
}

/// Returns the type path an `ns_include` argument refers to.
fn controller_path(expr: &Expr) -> Option<&syn::Path> {
    match expr {
        Expr::Reference(reference) => controller_path(&reference.expr),
        Expr::Paren(paren) => controller_path(&paren.expr),
        Expr::Struct(lit) => Some(&lit.path),
        Expr::Path(path) => Some(&path.path),
        _ => None,
    }
}

impl<'a> NamespaceResolver<'a> {
    pub fn new(index: &'a PackageIndex) -> Self {
        Self {
            index,
            strict: false,
        }
    }

    /// Warn about option expressions that are skipped.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns one tree per `new_namespace` call assigned inside a top-level function, in
    /// source order.
    pub fn resolve_file(&self, file: &syn::File) -> Vec<NamespaceNode> {
        let mut roots = Vec::new();
        for item in &file.items {
            let Item::Fn(function) = item else {
                continue;
            };
            for stmt in &function.block.stmts {
                let rhs = match stmt {
                    Stmt::Local(local) => local.init.as_ref().map(|init| &*init.expr),
                    Stmt::Expr(Expr::Assign(assign), _) => Some(&*assign.right),
                    _ => None,
                };
                let Some(Expr::Call(call)) = rhs else {
                    continue;
                };
                if callee_name(call).as_deref() == Some(NEW_NAMESPACE) {
                    let node = self.resolve_namespace(call);
                    debug!(
                        "Namespace {} in {}(): {} children",
                        node.base_path,
                        function.sig.ident,
                        node.children.len()
                    );
                    roots.push(node);
                }
            }
        }
        roots
    }

    /// Builds the node for one namespace call, recursing into nested namespaces.
    pub fn resolve_namespace(&self, call: &ExprCall) -> NamespaceNode {
        let (base_path, options) = split_namespace_call(call);
        let mut node = NamespaceNode {
            base_path,
            ..Default::default()
        };

        for option in &options {
            match classify(option) {
                NamespaceOption::Namespace(nested) => {
                    node.children.push(self.resolve_namespace(nested))
                }
                NamespaceOption::Include(include) => {
                    node.controllers.extend(self.resolve_include(include))
                }
                NamespaceOption::Other => {
                    if self.strict {
                        warn!("Unrecognized option in namespace {:?} skipped", node.base_path);
                    }
                }
            }
        }
        node
    }

    /// Resolves every controller argument of an `ns_include` call to its qualified name.
    fn resolve_include(&self, call: &ExprCall) -> Vec<String> {
        call.args
            .iter()
            .filter_map(|arg| {
                let path = controller_path(arg)?;
                let segments: Vec<String> =
                    path.segments.iter().map(|s| s.ident.to_string()).collect();
                let resolved = self.index.resolve_controller(&segments);
                if resolved.is_none() && self.strict {
                    warn!("Cannot resolve included controller {}", segments.join("::"));
                }
                resolved
            })
            .collect()
    }
}
