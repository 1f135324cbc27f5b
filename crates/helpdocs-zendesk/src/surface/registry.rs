//! Static table of Help Center operations per resource kind.
//!
//! Paths are relative to the Help Center API base and use `{}` for
//! positional path parameters. An operation with `body: true` takes a JSON
//! object as its last argument.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use super::Resource;
use crate::error::ZendeskError;
use crate::transport::{ApiRequest, Method, Payload};

use Method::{Delete, Get, Post, Put};

/// Characters left unescaped in path parameters: A-Z a-z 0-9 - . _ ~
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Description of one remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    /// Operation name.
    pub name: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Endpoint template.
    pub path: &'static str,
    /// Whether a JSON body follows the path parameters.
    pub body: bool,
}

const fn op(name: &'static str, method: Method, path: &'static str, body: bool) -> OperationSpec {
    OperationSpec {
        name,
        method,
        path,
        body,
    }
}

const ARTICLES: &[OperationSpec] = &[
    op("list", Get, "/articles.json?per_page=100", false),
    op("list_by_locale", Get, "/{}/articles.json?per_page=100", false),
    op("list_by_section", Get, "/sections/{}/articles.json?per_page=100", false),
    op("list_by_category", Get, "/categories/{}/articles.json?per_page=100", false),
    op("show", Get, "/articles/{}.json", false),
    op("create", Post, "/sections/{}/articles.json", true),
    op("create_with_locale", Post, "/{}/sections/{}/articles.json", true),
    op("update", Put, "/articles/{}.json", true),
    op("delete", Delete, "/articles/{}.json", false),
    op("associate_attachments", Post, "/articles/{}/bulk_attachments.json", true),
];

const ARTICLE_ATTACHMENTS: &[OperationSpec] = &[
    op("list", Get, "/articles/{}/attachments.json", false),
    op("show", Get, "/articles/attachments/{}.json", false),
    op("delete", Delete, "/articles/attachments/{}.json", false),
];

const SECTIONS: &[OperationSpec] = &[
    op("list", Get, "/sections.json?per_page=100", false),
    op("list_by_category", Get, "/categories/{}/sections.json?per_page=100", false),
    op("show", Get, "/sections/{}.json", false),
    op("create", Post, "/categories/{}/sections.json", true),
    op("update", Put, "/sections/{}.json", true),
    op("delete", Delete, "/sections/{}.json", false),
];

const ACCESS_POLICIES: &[OperationSpec] = &[
    op("show", Get, "/sections/{}/access_policy.json", false),
    op("update", Put, "/sections/{}/access_policy.json", true),
];

const CATEGORIES: &[OperationSpec] = &[
    op("list", Get, "/categories.json?per_page=100", false),
    op("show", Get, "/categories/{}.json", false),
    op("create", Post, "/categories.json", true),
    op("update", Put, "/categories/{}.json", true),
    op("delete", Delete, "/categories/{}.json", false),
];

const TRANSLATIONS: &[OperationSpec] = &[
    op("list_by_article", Get, "/articles/{}/translations.json", false),
    op("show_for_article", Get, "/articles/{}/translations/{}.json", false),
    op("create_for_article", Post, "/articles/{}/translations.json", true),
    op("update_for_article", Put, "/articles/{}/translations/{}.json", true),
    op("list_missing_for_article", Get, "/articles/{}/translations/missing.json", false),
    op("list_by_section", Get, "/sections/{}/translations.json", false),
    op("create_for_section", Post, "/sections/{}/translations.json", true),
    op("update_for_section", Put, "/sections/{}/translations/{}.json", true),
    op("list_by_category", Get, "/categories/{}/translations.json", false),
    op("create_for_category", Post, "/categories/{}/translations.json", true),
    op("update_for_category", Put, "/categories/{}/translations/{}.json", true),
    op("delete", Delete, "/translations/{}.json", false),
];

/// Operations the API exposes for `resource`.
#[must_use]
pub fn operations(resource: Resource) -> &'static [OperationSpec] {
    match resource {
        Resource::Articles => ARTICLES,
        Resource::ArticleAttachments => ARTICLE_ATTACHMENTS,
        Resource::Sections => SECTIONS,
        Resource::AccessPolicies => ACCESS_POLICIES,
        Resource::Categories => CATEGORIES,
        Resource::Translations => TRANSLATIONS,
    }
}

impl OperationSpec {
    /// Number of path parameters.
    #[must_use]
    pub fn path_params(&self) -> usize {
        self.path.matches("{}").count()
    }

    /// Total number of arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.path_params() + usize::from(self.body)
    }

    /// Resolve `args` into a request.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::InvalidArguments`] if the argument count is
    /// wrong, a path parameter is not a non-negative integer or non-empty
    /// string, or the body is not a JSON object.
    pub fn request(&self, resource: Resource, args: &[Value]) -> Result<ApiRequest, ZendeskError> {
        let invalid = |message: String| ZendeskError::InvalidArguments {
            resource,
            operation: self.name,
            message,
        };

        if args.len() != self.arity() {
            return Err(invalid(format!(
                "expected {} argument(s), got {}",
                self.arity(),
                args.len()
            )));
        }

        let (params, body) = args.split_at(self.path_params());

        let mut endpoint = String::with_capacity(self.path.len() + 16);
        let mut segments = self.path.split("{}");
        if let Some(first) = segments.next() {
            endpoint.push_str(first);
        }
        for (index, (segment, param)) in segments.zip(params).enumerate() {
            let rendered = match param {
                Value::Number(n) => match n.as_u64() {
                    Some(id) => id.to_string(),
                    None => {
                        return Err(invalid(format!(
                            "path parameter {index} must be a non-negative integer, got {n}"
                        )));
                    }
                },
                Value::String(s) if !s.is_empty() => {
                    utf8_percent_encode(s, PATH_ENCODE_SET).to_string()
                }
                other => {
                    return Err(invalid(format!(
                        "path parameter {index} must be a number or non-empty string, got {other}"
                    )));
                }
            };
            endpoint.push_str(&rendered);
            endpoint.push_str(segment);
        }

        let payload = match body.first() {
            Some(value @ Value::Object(_)) => Some(Payload::Json(value.clone())),
            Some(other) => {
                return Err(invalid(format!("body must be a JSON object, got {other}")));
            }
            None => None,
        };

        Ok(ApiRequest {
            resource,
            operation: self.name,
            method: self.method,
            endpoint,
            payload,
        })
    }
}
