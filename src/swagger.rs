//! Swagger 1.2 document model.
//!
//! These structures are what the pipeline produces and what the generated artifact embeds.
//! Field names follow the Swagger 1.2 resource listing / API declaration format so the
//! runtime side can deserialize the blobs without any mapping layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Swagger specification version written into every document
pub const SWAGGER_VERSION: &str = "1.2";

/// Content types every API declaration advertises
pub const DEFAULT_PRODUCES: [&str; 4] = [
    "application/json",
    "application/xml",
    "text/plain",
    "text/html",
];

/// Group declarations keyed by their relative include path
pub type DeclarationTable = BTreeMap<String, ApiDeclaration>;

/// Root schema: API metadata plus references to every top-level group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceListing {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    #[serde(rename = "swaggerVersion")]
    pub swagger_version: String,
    pub apis: Vec<ApiRef>,
    #[serde(rename = "info")]
    pub infos: Information,
}

/// API metadata taken from the entry file's doc comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Information {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact: String,
    #[serde(
        rename = "termsOfServiceUrl",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub terms_of_service_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(rename = "licenseUrl", default, skip_serializing_if = "String::is_empty")]
    pub license_url: String,
}

/// Reference from the root schema to one group declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiRef {
    pub path: String,
    pub description: String,
}

/// Fully resolved handlers attached to one route prefix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDeclaration {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    #[serde(rename = "swaggerVersion")]
    pub swagger_version: String,
    /// Absolute base URL used when the runtime has no address of its own
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// Relative include path (the table key)
    #[serde(rename = "resourcePath")]
    pub resource_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apis: Vec<Api>,
}

/// One handler entry: a route path and its operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Api {
    pub path: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "httpMethod")]
    pub http_method: String,
    pub nickname: String,
    #[serde(rename = "type")]
    pub response_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(
        rename = "responseMessages",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub response_messages: Vec<ResponseMessage>,
}

impl Default for Operation {
    fn default() -> Self {
        Self {
            http_method: "GET".to_string(),
            nickname: String::new(),
            response_type: String::new(),
            summary: String::new(),
            notes: String::new(),
            parameters: Vec::new(),
            response_messages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Where the value comes from: path, query, body, header or form
    #[serde(rename = "paramType")]
    pub param_type: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "dataType")]
    pub data_type: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub format: String,
    #[serde(rename = "allowMultiple")]
    pub allow_multiple: bool,
    pub required: bool,
    pub minimum: i64,
    pub maximum: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub code: i64,
    pub message: String,
    #[serde(rename = "responseModel")]
    pub response_model: String,
}

impl ApiDeclaration {
    /// Creates an empty declaration for the given relative path
    pub fn new(api_version: &str, resource_path: String, base_path: String) -> Self {
        Self {
            api_version: api_version.to_string(),
            swagger_version: SWAGGER_VERSION.to_string(),
            base_path,
            resource_path,
            description: String::new(),
            produces: DEFAULT_PRODUCES.iter().map(|s| s.to_string()).collect(),
            apis: Vec::new(),
        }
    }
}

/// Rewrites every `:name` path segment as `{name}`.
///
/// Segments that are already wrapped in braces are left alone, so applying this twice is a
/// no-op.
pub fn url_replace(src: &str) -> String {
    src.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{}}}", name),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
