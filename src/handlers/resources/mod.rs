//! The resource router: one endpoint at `/` that dispatches on the HTTP
//! method and the `resource` query parameter.
//!
//! Every request is first turned into a [`RequestContext`], so each
//! resource operation is a function of that context and the store seams in
//! [`AppState`].

pub mod assignments;
pub mod comments;
pub mod students;

use std::collections::HashMap;
use std::fmt;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Extension, Query, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::ApiError;
use crate::filter::ListParams;
use crate::handlers::AppState;
use crate::middleware::AuthUser;
use crate::validation::{parse_id, parse_id_param, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Assignments,
    Comments,
    Students,
}

impl Resource {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "assignments" => Some(Resource::Assignments),
            "comments" => Some(Resource::Comments),
            "students" => Some(Resource::Students),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Assignments => "assignments",
            Resource::Comments => "comments",
            Resource::Students => "students",
        })
    }
}

/// One parsed request: method, selector, query string and JSON body.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub resource: Option<String>,
    pub query: HashMap<String, String>,
    /// `Null` when the request had no body.
    pub body: Value,
    /// Set when the request came through token authentication.
    pub caller: Option<AuthUser>,
}

impl RequestContext {
    pub fn new(method: Method, query: HashMap<String, String>, body: Value) -> Self {
        let resource = query.get("resource").cloned();
        Self {
            method,
            resource,
            query,
            body,
            caller: None,
        }
    }

    pub fn with_caller(mut self, caller: Option<AuthUser>) -> Self {
        self.caller = caller;
        self
    }

    /// Build from raw parts. Malformed JSON is an error only for methods
    /// whose operation reads the body.
    pub fn from_parts(method: Method, query: HashMap<String, String>, raw_body: &[u8]) -> Result<Self, ApiError> {
        let body = if raw_body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            match serde_json::from_slice::<Value>(raw_body) {
                Ok(value) => value,
                Err(_) if method == Method::POST || method == Method::PUT => {
                    return Err(ApiError::invalid_json("Invalid JSON body"));
                }
                Err(e) => {
                    tracing::debug!("ignoring unreadable {} body: {}", method, e);
                    Value::Null
                }
            }
        };
        Ok(Self::new(method, query, body))
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Identifier from the query string; blank means absent.
    pub fn query_id(&self, name: &str) -> Result<Option<i64>, ValidationError> {
        parse_id_param(name, self.query_param(name))
    }

    /// Query `id` first, then body `id`.
    pub fn target_id(&self) -> Result<Option<i64>, ValidationError> {
        if let Some(id) = self.query_id("id")? {
            return Ok(Some(id));
        }
        match self.body.get("id").filter(|v| !v.is_null()) {
            None => Ok(None),
            Some(value) => parse_id(value)
                .map(Some)
                .ok_or_else(|| ValidationError::for_field("Invalid identifier", "id", "Must be a positive integer")),
        }
    }

    /// Same as [`target_id`](Self::target_id) but the id must be there.
    pub fn required_target_id(&self) -> Result<i64, ValidationError> {
        self.target_id()?
            .ok_or_else(|| ValidationError::for_field("Missing required fields", "id", "This field is required"))
    }

    /// `action` from the query string or the body.
    pub fn action(&self) -> Option<&str> {
        self.query_param("action")
            .or_else(|| self.body.get("action").and_then(Value::as_str))
    }

    pub fn list_params(&self) -> ListParams {
        ListParams {
            search: self.query.get("search").cloned(),
            sort: self.query.get("sort").cloned(),
            order: self.query.get("order").cloned(),
        }
    }
}

/// `ANY /?resource=...`
pub async fn resource_handler(
    State(state): State<AppState>,
    method: Method,
    caller: Option<Extension<AuthUser>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let result = match (query, body) {
        (Ok(Query(query)), Ok(body)) => match RequestContext::from_parts(method, query, &body) {
            Ok(ctx) => dispatch(&state, &ctx.with_caller(caller.map(|Extension(user)| user))).await,
            Err(e) => Err(e),
        },
        (Err(rejection), _) => Err(rejection.into()),
        (_, Err(rejection)) => Err(rejection.into()),
    };
    result.unwrap_or_else(|e| {
        if e.status_code() < 500 {
            tracing::debug!("request rejected ({}): {}", e.error_code(), e);
        }
        e.into_response()
    })
}

/// Route one request to its resource operation.
pub async fn dispatch(state: &AppState, ctx: &RequestContext) -> Result<Response, ApiError> {
    if !matches!(ctx.method, Method::GET | Method::POST | Method::PUT | Method::DELETE) {
        return Err(ApiError::method_not_allowed(format!("Method {} not allowed", ctx.method)));
    }

    let resource = ctx
        .resource
        .as_deref()
        .and_then(Resource::parse)
        .ok_or_else(|| ApiError::bad_request("Invalid resource"))?;

    match &ctx.caller {
        Some(caller) => tracing::debug!("{} {} by student {}", ctx.method, resource, caller.id),
        None => tracing::debug!("{} {}", ctx.method, resource),
    }

    match (&ctx.method, resource) {
        (&Method::GET, Resource::Assignments) => assignments::get(state, ctx).await,
        (&Method::POST, Resource::Assignments) => assignments::create(state, ctx).await,
        (&Method::PUT, Resource::Assignments) => assignments::update(state, ctx).await,
        (&Method::DELETE, Resource::Assignments) => assignments::delete(state, ctx).await,

        (&Method::GET, Resource::Comments) => comments::list(state, ctx).await,
        (&Method::POST, Resource::Comments) => comments::create(state, ctx).await,
        (&Method::DELETE, Resource::Comments) => comments::delete(state, ctx).await,

        (&Method::GET, Resource::Students) => students::get(state, ctx).await,
        (&Method::POST, Resource::Students) if ctx.action() == Some("change_password") => {
            students::change_password(state, ctx).await
        }
        (&Method::POST, Resource::Students) => students::create(state, ctx).await,
        (&Method::PUT, Resource::Students) => students::update(state, ctx).await,
        (&Method::DELETE, Resource::Students) => students::delete(state, ctx).await,

        (method, resource) => Err(ApiError::bad_request(format!(
            "{} is not supported for {}",
            method, resource
        ))),
    }
}
