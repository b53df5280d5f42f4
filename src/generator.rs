//! One documentation generation run.
//!
//! [`DocsGenerator`] owns every setting and table of a run: it parses the entry router,
//! indexes the packages the router imports, resolves the namespace trees, assembles the
//! schema and writes the artifact. Nothing is written unless every earlier step succeeded.

use crate::assembler::{AssembledSchema, SchemaAssembler};
use crate::config::ServerConfig;
use crate::emitter::write_artifact;
use crate::error::Result;
use crate::indexer::PackageIndex;
use crate::namespace::{root_info, NamespaceResolver, NEW_NAMESPACE};
use crate::parser::AstParser;
use crate::resolver::PackageResolver;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Entry router file, relative to the project root
pub const DEFAULT_ROUTER_FILE: &str = "src/routers/router.rs";
/// Crate whose packages are never scanned
pub const DEFAULT_FRAMEWORK_ROOT: &str = "beego";

/// Result of the analysis half of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocs {
    pub schema: AssembledSchema,
    /// Number of namespace trees found in the router
    pub namespaces: usize,
}

impl GeneratedDocs {
    pub fn handler_count(&self) -> usize {
        self.schema
            .declarations
            .values()
            .map(|decl| decl.apis.len())
            .sum()
    }
}

pub struct DocsGenerator {
    project_root: PathBuf,
    router_file: PathBuf,
    framework_root: String,
    config: ServerConfig,
    strict: bool,
    resolver: Box<dyn PackageResolver>,
}

impl DocsGenerator {
    pub fn new(project_root: PathBuf, resolver: Box<dyn PackageResolver>) -> Self {
        Self {
            project_root,
            router_file: PathBuf::from(DEFAULT_ROUTER_FILE),
            framework_root: DEFAULT_FRAMEWORK_ROOT.to_string(),
            config: ServerConfig::default(),
            strict: false,
            resolver,
        }
    }

    /// Uses another entry file. Relative paths are taken from the project root.
    pub fn with_router_file(mut self, router_file: PathBuf) -> Self {
        self.router_file = router_file;
        self
    }

    pub fn with_framework_root(mut self, framework_root: impl Into<String>) -> Self {
        self.framework_root = framework_root.into();
        self
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Log a warning for every silently dropped handler or namespace option.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn router_path(&self) -> PathBuf {
        if self.router_file.is_absolute() {
            self.router_file.clone()
        } else {
            self.project_root.join(&self.router_file)
        }
    }

    /// Runs the analysis without writing anything.
    ///
    /// # Errors
    ///
    /// Fails if the router or any file of an imported package cannot be parsed, or if an
    /// imported package cannot be found.
    pub fn assemble(&self) -> Result<GeneratedDocs> {
        let router_path = self.router_path();
        info!("Parsing router {}", router_path.display());
        let router = AstParser::parse_file(&router_path)?;
        let file = &router.syntax_tree;

        let root = root_info(file);
        debug!("API version {:?}, title {:?}", root.api_version, root.infos.title);

        let mut index = PackageIndex::new(self.framework_root.clone()).with_strict(self.strict);
        index.index_imports(file, self.resolver.as_ref())?;

        let namespaces = NamespaceResolver::new(&index)
            .with_strict(self.strict)
            .resolve_file(file);
        if namespaces.is_empty() {
            warn!("No {} call found in {}", NEW_NAMESPACE, router_path.display());
        }

        let mut assembler = SchemaAssembler::new(root, &index, &self.config);
        for namespace in &namespaces {
            assembler.add_namespace(namespace);
        }

        Ok(GeneratedDocs {
            schema: assembler.build(),
            namespaces: namespaces.len(),
        })
    }

    /// Runs the analysis and writes `docs/docs.rs` under the project root.
    pub fn generate(&self) -> Result<(GeneratedDocs, PathBuf)> {
        let docs = self.assemble()?;
        let path = write_artifact(&docs.schema, &self.project_root)?;
        info!("Wrote {}", path.display());
        Ok((docs, path))
    }
}
