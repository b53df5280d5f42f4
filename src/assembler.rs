use crate::config::ServerConfig;
use crate::indexer::PackageIndex;
use crate::namespace::NamespaceNode;
use crate::swagger::{url_replace, Api, ApiDeclaration, ApiRef, DeclarationTable, ResourceListing};
use log::debug;
use std::collections::BTreeMap;

/// Base segment used when a root namespace has an empty path
pub const DEFAULT_API_BASE: &str = "/v1";

/// Builds the root schema and the group declaration table from namespace trees.
///
/// Root namespaces are added one at a time; each contributes declarations keyed by the
/// relative path of every namespace below it, while its own path becomes the API base segment
/// of the declarations' `basePath`.
pub struct SchemaAssembler<'a> {
    index: &'a PackageIndex,
    config: &'a ServerConfig,
    root: ResourceListing,
    declarations: DeclarationTable,
    api_bases: BTreeMap<String, String>,
}

/// The two independently serializable halves of the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledSchema {
    pub root: ResourceListing,
    pub declarations: DeclarationTable,
    /// API base segment of each declaration, keyed like `declarations`
    pub api_bases: BTreeMap<String, String>,
}

/// Returns the API base segment of a root namespace.
fn api_base(namespace: &NamespaceNode) -> String {
    if namespace.base_path.is_empty() {
        DEFAULT_API_BASE.to_string()
    } else {
        url_replace(&namespace.base_path)
    }
}

/// Where the declarations of one root namespace are served from.
struct Mount<'m> {
    base: &'m str,
    base_url: &'m str,
}

/// Combine a prefix and path, handling slashes correctly
fn combine_paths(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }

    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, path)
    }
}

impl<'a> SchemaAssembler<'a> {
    /// Starts from the root metadata read off the entry file.
    pub fn new(root: ResourceListing, index: &'a PackageIndex, config: &'a ServerConfig) -> Self {
        Self {
            index,
            config,
            root,
            declarations: DeclarationTable::new(),
            api_bases: BTreeMap::new(),
        }
    }

    /// Adds one root namespace tree.
    pub fn add_namespace(&mut self, namespace: &NamespaceNode) {
        let base = api_base(namespace);
        let base_url = self.config.base_url(&base);
        debug!("Assembling namespace {} (base URL {})", base, base_url);

        let mount = Mount {
            base: &base,
            base_url: &base_url,
        };

        self.attach(&namespace.base_path, &namespace.controllers, &mount);

        for child in &namespace.children {
            let description = self.attach(&child.base_path, &child.controllers, &mount);
            self.root.apis.push(ApiRef {
                path: url_replace(&child.base_path),
                description,
            });
            self.add_descendants(&child.base_path, child, &mount);
        }
    }

    fn add_descendants(&mut self, prefix: &str, node: &NamespaceNode, mount: &Mount) {
        for child in &node.children {
            let path = combine_paths(prefix, &child.base_path);
            self.attach(&path, &child.controllers, mount);
            self.add_descendants(&path, child, mount);
        }
    }

    /// Appends the handlers of `controllers` to the declaration at `path` and returns the
    /// description found for them.
    ///
    /// No declaration is created when the controllers contribute no handler.
    fn attach(&mut self, path: &str, controllers: &[String], mount: &Mount) -> String {
        let description = controllers
            .iter()
            .filter_map(|c| self.index.controller_doc(c))
            .find(|doc| !doc.is_empty())
            .unwrap_or_default()
            .to_string();

        let apis: Vec<Api> = controllers
            .iter()
            .filter_map(|c| self.index.handlers(c))
            .flatten()
            .map(|api| Api {
                path: url_replace(&api.path),
                ..api.clone()
            })
            .collect();
        if apis.is_empty() {
            return description;
        }

        let key = url_replace(path);
        debug!("Group {}: {} handlers", key, apis.len());
        self.api_bases
            .entry(key.clone())
            .or_insert_with(|| mount.base.to_string());
        let declaration = self.declarations.entry(key.clone()).or_insert_with(|| {
            ApiDeclaration::new(&self.root.api_version, key, mount.base_url.to_string())
        });
        if declaration.description.is_empty() {
            declaration.description = description.clone();
        }
        declaration.apis.extend(apis);
        description
    }

    pub fn build(self) -> AssembledSchema {
        AssembledSchema {
            root: self.root,
            declarations: self.declarations,
            api_bases: self.api_bases,
        }
    }
}
