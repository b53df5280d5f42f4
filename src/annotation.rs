//! Structured doc comment directives.
//!
//! Handler methods describe their route with tag lines in their doc comment:
//!
//! ```text
//! /// @Title Login
//! /// @Description logs a user into the system
//! /// @Param username query string true "the username"
//! /// @Success 200 {string} login success
//! /// @Failure 403 user not exist
//! /// @router /login [post]
//! ```
//!
//! Each line is parsed on its own into an [`Annotation`]; unknown lines are ignored. The entry
//! router file carries the API-wide directives (`@APIVersion`, `@Title`, ...) in its `//!`
//! comment, parsed by [`apply_file_directive`].

use crate::swagger::{
    Api, Operation, Parameter, ResourceListing, ResponseMessage, SWAGGER_VERSION,
};
use crate::tokenizer::{parse_bool, tokenize_params};

/// One parsed directive from a handler's doc comment
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Router { path: String, method: String },
    Title(String),
    Description(String),
    Success(ResponseMessage),
    Failure(ResponseMessage),
    Param(Parameter),
    Type(String),
}

type DirectiveParser = fn(&str) -> Option<Annotation>;

/// Handler-level directives. A keyword must come before any other keyword it is a prefix of.
const HANDLER_DIRECTIVES: &[(&str, DirectiveParser)] = &[
    ("@router", parse_router),
    ("@Title", |v| Some(Annotation::Title(v.to_string()))),
    ("@Description", |v| Some(Annotation::Description(v.to_string()))),
    ("@Success", parse_success),
    ("@Failure", parse_failure),
    ("@Param", parse_param),
    ("@Type", |v| Some(Annotation::Type(v.to_string()))),
];

type InfoSetter = fn(&mut ResourceListing, String);

/// File-level directives, `@LicenseUrl` ahead of `@License`.
const FILE_DIRECTIVES: &[(&str, InfoSetter)] = &[
    ("@APIVersion", |r, v| r.api_version = v),
    ("@Title", |r, v| r.infos.title = v),
    ("@Description", |r, v| r.infos.description = v),
    ("@TermsOfServiceUrl", |r, v| r.infos.terms_of_service_url = v),
    ("@Contact", |r, v| r.infos.contact = v),
    ("@LicenseUrl", |r, v| r.infos.license_url = v),
    ("@License", |r, v| r.infos.license = v),
];

/// Strips comment markers and surrounding whitespace from one comment line.
pub fn normalize_line(line: &str) -> &str {
    line.trim()
        .trim_start_matches('/')
        .trim_start_matches('!')
        .trim()
}

/// Matches `line` against a directive table, returning the entry and the value that follows
/// the literal keyword.
fn match_directive<'t, 'l, T>(
    table: &'t [(&'static str, T)],
    line: &'l str,
) -> Option<(&'t T, &'l str)> {
    table.iter().find_map(|(keyword, handler)| {
        line.strip_prefix(keyword)
            .map(|value| (handler, value.trim_start()))
    })
}

/// Parses one normalized comment line. Returns `None` for anything that is not a handler
/// directive, and for directives too malformed to carry a value.
pub fn parse_tag(line: &str) -> Option<Annotation> {
    let (parser, value) = match_directive(HANDLER_DIRECTIVES, line)?;
    parser(value)
}

/// Applies one file-level directive to the root schema. Returns whether the line matched.
pub fn apply_file_directive(root: &mut ResourceListing, line: &str) -> bool {
    match match_directive(FILE_DIRECTIVES, normalize_line(line)) {
        Some((setter, value)) => {
            setter(root, value.to_string());
            true
        }
        None => false,
    }
}

fn parse_router(value: &str) -> Option<Annotation> {
    let mut tokens = value.split_whitespace();
    let path = tokens.next().unwrap_or_default().to_string();
    let method = tokens
        .next()
        .map(|m| m.trim_matches(|c| c == '[' || c == ']').to_uppercase())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "GET".to_string());
    Some(Annotation::Router { path, method })
}

fn parse_code(s: &str) -> i64 {
    s.parse().unwrap_or(0)
}

fn parse_success(value: &str) -> Option<Annotation> {
    let mut tokens = value.split_whitespace();
    let code = parse_code(tokens.next().unwrap_or_default());
    let message = tokens.next().unwrap_or_default().to_string();
    let response_model = tokens.next().unwrap_or_default().to_string();
    Some(Annotation::Success(ResponseMessage {
        code,
        message,
        response_model,
    }))
}

// Failures carry free text after the code and no response model.
fn parse_failure(value: &str) -> Option<Annotation> {
    let (code, message) = value.split_once(' ').unwrap_or((value, ""));
    Some(Annotation::Failure(ResponseMessage {
        code: parse_code(code),
        message: message.to_string(),
        response_model: String::new(),
    }))
}

fn parse_param(value: &str) -> Option<Annotation> {
    let mut fields = tokenize_params(value.trim()).into_iter();
    let name = fields.next()?;
    let param_type = fields.next()?;
    let data_type = fields.next()?;
    let fourth = fields.next()?;
    let (required, description) = match fields.next() {
        Some(description) => (parse_bool(&fourth).unwrap_or(false), description),
        None => (false, fourth),
    };
    Some(Annotation::Param(Parameter {
        param_type,
        name,
        description,
        data_type,
        required,
        ..Default::default()
    }))
}

/// Folds the annotations of one doc comment into a handler entry.
///
/// The entry is returned even without a route; callers decide whether to keep it.
pub fn build_handler<'a, I>(lines: I) -> Api
where
    I: IntoIterator<Item = &'a str>,
{
    let mut api = Api::default();
    let mut operation = Operation::default();

    for annotation in lines.into_iter().filter_map(|l| parse_tag(normalize_line(l))) {
        match annotation {
            Annotation::Router { path, method } => {
                api.path = path;
                operation.http_method = method;
            }
            Annotation::Title(title) => operation.nickname = title,
            Annotation::Description(summary) => operation.summary = summary,
            Annotation::Success(message) | Annotation::Failure(message) => {
                operation.response_messages.push(message)
            }
            Annotation::Param(param) => operation.parameters.push(param),
            Annotation::Type(response_type) => operation.response_type = response_type,
        }
    }

    api.operations.push(operation);
    api
}

/// Collects the file-level directives of the entry file into a fresh root schema.
pub fn build_root_info<'a, I>(lines: I) -> ResourceListing
where
    I: IntoIterator<Item = &'a str>,
{
    let mut root = ResourceListing {
        swagger_version: SWAGGER_VERSION.to_string(),
        ..Default::default()
    };
    for line in lines {
        apply_file_directive(&mut root, line);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn router(line: &str) -> (String, String) {
        match parse_tag(line) {
            Some(Annotation::Router { path, method }) => (path, method),
            other => panic!("expected router annotation, got {:?}", other),
        }
    }

    #[test]
    fn test_router_with_method() {
        assert_eq!(router("@router /login [post]"), ("/login".into(), "POST".into()));
        assert_eq!(router("@router /:uid [delete]"), ("/:uid".into(), "DELETE".into()));
    }

    #[test]
    fn test_router_defaults_to_get() {
        assert_eq!(router("@router /"), ("/".into(), "GET".into()));
        assert_eq!(router("@router /logout   "), ("/logout".into(), "GET".into()));
    }

    #[test]
    fn test_router_without_path() {
        assert_eq!(router("@router"), ("".into(), "GET".into()));
    }

    #[test]
    fn test_value_directives_strip_keyword_only() {
        assert_eq!(parse_tag("@Title Login"), Some(Annotation::Title("Login".into())));
        assert_eq!(parse_tag("@Titletitle"), Some(Annotation::Title("title".into())));
        assert_eq!(
            parse_tag("@Description logs the user in"),
            Some(Annotation::Description("logs the user in".into()))
        );
        assert_eq!(parse_tag("@Type models.User"), Some(Annotation::Type("models.User".into())));
    }

    #[test]
    fn test_success_three_tokens() {
        let parsed = parse_tag("@Success 200 {object} models.User");
        assert_eq!(
            parsed,
            Some(Annotation::Success(ResponseMessage {
                code: 200,
                message: "{object}".into(),
                response_model: "models.User".into(),
            }))
        );
    }

    #[test]
    fn test_success_bad_code_is_zero() {
        match parse_tag("@Success ok {string}") {
            Some(Annotation::Success(msg)) => {
                assert_eq!(msg.code, 0);
                assert_eq!(msg.message, "{string}");
                assert_eq!(msg.response_model, "");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_failure_keeps_free_text() {
        assert_eq!(
            parse_tag("@Failure 403 user not exist"),
            Some(Annotation::Failure(ResponseMessage {
                code: 403,
                message: "user not exist".into(),
                response_model: String::new(),
            }))
        );
        match parse_tag("@Failure forbidden") {
            Some(Annotation::Failure(msg)) => {
                assert_eq!(msg.code, 0);
                assert_eq!(msg.message, "");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_param_five_fields() {
        match parse_tag(r#"@Param username query string true "the username""#) {
            Some(Annotation::Param(p)) => {
                assert_eq!(p.name, "username");
                assert_eq!(p.param_type, "query");
                assert_eq!(p.data_type, "string");
                assert!(p.required);
                assert_eq!(p.description, "the username");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_param_four_fields_not_required() {
        match parse_tag(r#"@Param uid path string "the uid""#) {
            Some(Annotation::Param(p)) => {
                assert!(!p.required);
                assert_eq!(p.description, "the uid");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_param_truncated_is_dropped() {
        assert_eq!(parse_tag("@Param uid path"), None);
    }

    #[test]
    fn test_unknown_lines_ignored() {
        assert_eq!(parse_tag("Login logs the user in"), None);
        assert_eq!(parse_tag("@Deprecated"), None);
        assert_eq!(parse_tag(""), None);
    }

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line("  // @router /x "), "@router /x");
        assert_eq!(normalize_line("//! @APIVersion 1.0.0"), "@APIVersion 1.0.0");
        assert_eq!(normalize_line(" @Title t"), "@Title t");
    }

    #[test]
    fn test_build_handler_accumulates_in_order() {
        let api = build_handler(vec![
            " @Title Get",
            " @Description find user by uid",
            " @Param uid path string true \"the key\"",
            " @Success 200 {object} models.User",
            " @Failure 403 :uid is empty",
            " @router /:uid [get]",
        ]);
        assert_eq!(api.path, "/:uid");
        let op = &api.operations[0];
        assert_eq!(op.http_method, "GET");
        assert_eq!(op.nickname, "Get");
        assert_eq!(op.summary, "find user by uid");
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.response_messages.len(), 2);
        assert_eq!(op.response_messages[0].code, 200);
        assert_eq!(op.response_messages[1].message, ":uid is empty");
    }

    #[test]
    fn test_build_handler_without_router_has_empty_path() {
        let api = build_handler(vec![" Plain documentation", " @Title Helper"]);
        assert!(api.path.is_empty());
    }

    #[test]
    fn test_root_info_directives() {
        let root = build_root_info(vec![
            " @APIVersion 1.0.0",
            " @Title beego Test API",
            " @Description beego has a very cool tools to autogenerate documents for your API",
            " @Contact astaxie@gmail.com",
            " @TermsOfServiceUrl http://beego.me/",
            " @License Apache 2.0",
            " @LicenseUrl http://www.apache.org/licenses/LICENSE-2.0.html",
        ]);
        assert_eq!(root.api_version, "1.0.0");
        assert_eq!(root.swagger_version, "1.2");
        assert_eq!(root.infos.title, "beego Test API");
        assert_eq!(root.infos.contact, "astaxie@gmail.com");
        assert_eq!(root.infos.terms_of_service_url, "http://beego.me/");
        assert_eq!(root.infos.license, "Apache 2.0");
        assert_eq!(
            root.infos.license_url,
            "http://www.apache.org/licenses/LICENSE-2.0.html"
        );
    }
}
