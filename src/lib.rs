//! Swagger From Source - embeddable Swagger documentation from annotated Rust routers.
//!
//! The library statically analyzes a web project whose routes are registered through nested
//! namespace calls (`new_namespace`, `ns_namespace`, `ns_include`) and whose handlers carry
//! structured `@` tags in their doc comments. It produces a Swagger 1.2 resource listing plus
//! one API declaration per route group, and emits them as a Rust module that registers the
//! documentation at startup.
//!
//! # Architecture
//!
//! 1. [`parser`] - Parses Rust source files into ASTs and reads their doc comments
//! 2. [`annotation`] and [`tokenizer`] - Turn `@` tag lines into handler entries and API metadata
//! 3. [`resolver`] - Locates imported packages on a search path
//! 4. [`scanner`] and [`indexer`] - Scan imported packages for controllers and their handlers
//! 5. [`namespace`] - Walks the router's namespace calls into trees of paths and controllers
//! 6. [`assembler`] - Merges the trees into the root schema and the group declarations
//! 7. [`emitter`] - Serializes both halves and writes the generated module
//! 8. [`generator`] - Runs the whole pipeline for one project
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_from_source::{
//!     config::ServerConfig,
//!     generator::DocsGenerator,
//!     resolver::SearchPathResolver,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let project = PathBuf::from("./my-project");
//! let resolver = SearchPathResolver::new(vec![PathBuf::from("/home/me/src")])
//!     .with_crate_src(project.join("src"));
//! let config = ServerConfig::load(Path::new("./my-project")).unwrap();
//!
//! let generator = DocsGenerator::new(project, Box::new(resolver)).with_config(config);
//! let (docs, artifact) = generator.generate().unwrap();
//! println!("{} groups written to {}", docs.schema.declarations.len(), artifact.display());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod annotation;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod indexer;
pub mod namespace;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod swagger;
pub mod tokenizer;
