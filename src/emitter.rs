//! Artifact generation.
//!
//! The root schema, the group declaration table and the API base of every group are serialized
//! to JSON independently and embedded as string constants into a generated Rust module. The module's `init` function
//! deserializes both blobs at load time and registers every group with the framework's
//! documentation registry.

use crate::assembler::AssembledSchema;
use crate::error::Result;
use crate::swagger::{DeclarationTable, ResourceListing};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of the generated artifact, relative to the project root
pub const DOCS_DIR: &str = "docs";
/// File name of the generated artifact
pub const DOCS_FILE: &str = "docs.rs";

const ROOT_INFO_PLACEHOLDER: &str = "{{.rootinfo}}";
const SUB_API_PLACEHOLDER: &str = "{{.subapi}}";
const API_BASES_PLACEHOLDER: &str = "{{.apibases}}";

const DOCS_TEMPLATE: &str = r####"// Code generated by swagger-from-source. DO NOT EDIT.

use std::collections::BTreeMap;

use beego::swagger::{ApiDeclaration, ResourceListing};

const ROOT_INFO: &str = {{.rootinfo}};
const SUB_API: &str = {{.subapi}};
const API_BASES: &str = {{.apibases}};

/// Registers the embedded API documentation. Call once at startup, before serving.
pub fn init() {
    let rootapi: ResourceListing = match serde_json::from_str(ROOT_INFO) {
        Ok(rootapi) => rootapi,
        Err(err) => {
            log::error!("{}", err);
            return;
        }
    };
    let apilist: BTreeMap<String, ApiDeclaration> = match serde_json::from_str(SUB_API) {
        Ok(apilist) => apilist,
        Err(err) => {
            log::error!("{}", err);
            return;
        }
    };
    let bases: BTreeMap<String, String> = match serde_json::from_str(API_BASES) {
        Ok(bases) => bases,
        Err(err) => {
            log::error!("{}", err);
            return;
        }
    };
    log::info!("{:?}", apilist.keys().collect::<Vec<_>>());
    beego::register_doc_api("Root", rootapi);
    for (k, mut v) in apilist {
        for a in v.apis.iter_mut() {
            a.path = url_replace(&format!("{}{}", k, a.path));
        }
        let addr = beego::http_addr();
        if !addr.is_empty() {
            let base = bases.get(&k).map(String::as_str).unwrap_or_default();
            v.base_path = format!("{}:{}{}", addr, beego::http_port(), base);
        }
        beego::register_doc_api(k.trim_matches('/'), v);
    }
}

fn url_replace(src: &str) -> String {
    src.split('/')
        .map(|p| match p.strip_prefix(':') {
            Some(name) => format!("{{{}}}", name),
            None => p.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
"####;

/// Serializes the root schema to compact JSON.
pub fn serialize_root(root: &ResourceListing) -> Result<String> {
    debug!("Serializing root schema");
    Ok(serde_json::to_string(root)?)
}

/// Serializes the group declaration table to compact JSON, keys in sorted order.
pub fn serialize_declarations(declarations: &DeclarationTable) -> Result<String> {
    debug!("Serializing {} group declarations", declarations.len());
    Ok(serde_json::to_string(declarations)?)
}

/// Serializes the API base of every group to compact JSON.
pub fn serialize_api_bases(api_bases: &BTreeMap<String, String>) -> Result<String> {
    Ok(serde_json::to_string(api_bases)?)
}

/// Serializes the whole schema for inspection, as pretty JSON.
pub fn serialize_json(schema: &AssembledSchema) -> Result<String> {
    Ok(serde_json::to_string_pretty(&inspection_value(schema)?)?)
}

/// Serializes the whole schema for inspection, as YAML.
pub fn serialize_yaml(schema: &AssembledSchema) -> Result<String> {
    Ok(serde_yaml::to_string(&inspection_value(schema)?)?)
}

fn inspection_value(schema: &AssembledSchema) -> Result<serde_json::Value> {
    Ok(serde_json::json!({
        "root": serde_json::to_value(&schema.root)?,
        "apis": serde_json::to_value(&schema.declarations)?,
    }))
}

/// Wraps `content` in a raw string literal that `content` cannot terminate early.
fn raw_string_literal(content: &str) -> String {
    let mut hashes = 1;
    while content.contains(&format!("\"{}", "#".repeat(hashes))) {
        hashes += 1;
    }
    let fence = "#".repeat(hashes);
    format!("r{fence}\"{content}\"{fence}")
}

/// Embeds the blobs into the artifact template.
///
/// `api_bases` maps each group to the base segment the runtime appends to its own address.
pub fn render_artifact(root_info: &str, sub_api: &str, api_bases: &str) -> String {
    fill_template(
        DOCS_TEMPLATE,
        &[
            (ROOT_INFO_PLACEHOLDER, raw_string_literal(root_info)),
            (SUB_API_PLACEHOLDER, raw_string_literal(sub_api)),
            (API_BASES_PLACEHOLDER, raw_string_literal(api_bases)),
        ],
    )
}

/// Substitutes placeholders in a single pass, so inserted values are never rescanned.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = values
            .iter()
            .filter_map(|(placeholder, value)| {
                rest.find(placeholder).map(|at| (at, placeholder.len(), value))
            })
            .min_by_key(|(at, _, _)| *at);
        let Some((at, len, value)) = next else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + len..];
    }
}

/// Returns where the artifact of `project_root` is written.
pub fn artifact_path(project_root: &Path) -> PathBuf {
    project_root.join(DOCS_DIR).join(DOCS_FILE)
}

/// Serializes `schema` and writes the artifact under `project_root/docs/`.
///
/// Creates the `docs` directory if it doesn't exist.
pub fn write_artifact(schema: &AssembledSchema, project_root: &Path) -> Result<PathBuf> {
    let root_info = serialize_root(&schema.root)?;
    let sub_api = serialize_declarations(&schema.declarations)?;
    let api_bases = serialize_api_bases(&schema.api_bases)?;
    let content = render_artifact(&root_info, &sub_api, &api_bases);

    let path = artifact_path(project_root);
    write_to_file(&content, &path)?;
    Ok(path)
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
