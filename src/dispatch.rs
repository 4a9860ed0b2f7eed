//! HTTP dispatch glue: binds every registered class's endpoint table into
//! an axum `Router`. Templates use `<name>` placeholders per path segment;
//! this module translates them into axum's `:name` syntax.

use crate::adapter::{Adapter, HalAdapter};
use crate::endpoint::{ActionInput, ActionSpec, RouteDescriptor};
use crate::error::{ApiError, ConfigError};
use crate::registry::Registry;
use crate::resource::ResourceClass;
use crate::url::join_parts;
use crate::validation::translate_and_validate;
use axum::{
    extract::{Path, Query},
    http::{Method, StatusCode},
    response::IntoResponse,
    response::Response,
    routing::{MethodFilter, MethodRouter},
    Json, Router,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Translate a `<name>` URL template into axum path syntax.
pub fn to_axum_path(template: &str) -> String {
    template
        .split('/')
        .map(|segment| {
            if segment.starts_with('<') && segment.ends_with('>') {
                format!(":{}", &segment[1..segment.len() - 1])
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn prefixed(prefix: &str, template: &str) -> String {
    let joined = join_parts(&[prefix, template]);
    if template.ends_with('/') && joined != "/" {
        format!("{}/", joined)
    } else {
        joined
    }
}

/// Full route template for one descriptor: the class's instance or
/// collection URL plus the descriptor's suffix.
fn route_template(class: &ResourceClass, descriptor: &RouteDescriptor) -> String {
    let base = if descriptor.options.no_pks {
        class.base_url_sans_pks()
    } else {
        class.base_url()
    };
    if descriptor.route.is_empty() {
        base.to_string()
    } else {
        prefixed(base, &descriptor.route)
    }
}

fn method_filter(method: &Method) -> Result<MethodFilter, ConfigError> {
    Ok(match *method {
        Method::GET => MethodFilter::GET,
        Method::POST => MethodFilter::POST,
        Method::PUT => MethodFilter::PUT,
        Method::PATCH => MethodFilter::PATCH,
        Method::DELETE => MethodFilter::DELETE,
        Method::HEAD => MethodFilter::HEAD,
        Method::OPTIONS => MethodFilter::OPTIONS,
        ref other => {
            return Err(ConfigError::InvalidResource {
                resource: String::new(),
                message: format!("unsupported HTTP method '{}'", other),
            })
        }
    })
}

/// Binds a registry's endpoint tables into an axum router under a URL
/// prefix, serializing through an adapter (HAL by default).
pub struct Dispatcher {
    prefix: String,
    registry: Arc<Registry>,
    adapter: Arc<dyn Adapter>,
}

impl Dispatcher {
    pub fn new(prefix: impl Into<String>, registry: Arc<Registry>) -> Self {
        Dispatcher {
            prefix: prefix.into(),
            registry,
            adapter: Arc::new(HalAdapter),
        }
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn Adapter>) -> Self {
        self.adapter = adapter;
        self
    }

    /// Build the router. Fails if a route references an action its class
    /// never registered or names an unsupported HTTP method.
    pub fn into_router(self) -> Result<Router, ConfigError> {
        let mut method_routers: BTreeMap<String, MethodRouter> = BTreeMap::new();
        for class in self.registry.classes() {
            for (action, descriptor) in class.endpoints().entries() {
                let spec = class.action_spec(action).ok_or_else(|| {
                    ConfigError::InvalidResource {
                        resource: class.name().to_string(),
                        message: format!("route registered for unknown action '{}'", action),
                    }
                })?;
                let template = route_template(class, descriptor);
                let path = to_axum_path(&prefixed(&self.prefix, &template));

                let mut filter: Option<MethodFilter> = None;
                for method in &descriptor.options.methods {
                    let next = method_filter(method).map_err(|_| ConfigError::InvalidResource {
                        resource: class.name().to_string(),
                        message: format!("unsupported HTTP method for action '{}'", action),
                    })?;
                    filter = Some(match filter {
                        Some(current) => current.or(next),
                        None => next,
                    });
                }
                let filter = filter.unwrap_or(MethodFilter::GET);

                tracing::info!(
                    resource = class.name(),
                    action = %action,
                    route = %path,
                    "binding endpoint"
                );
                let handler = make_handler(
                    Arc::clone(class),
                    spec.clone(),
                    Arc::clone(&self.registry),
                    Arc::clone(&self.adapter),
                );
                let entry = method_routers.entry(path).or_default();
                *entry = entry.clone().on(filter, handler);
            }
        }

        let mut router = Router::new();
        for (path, method_router) in method_routers {
            router = router.route(&path, method_router);
        }
        Ok(router.layer(TraceLayer::new_for_http()))
    }
}

fn make_handler(
    class: Arc<ResourceClass>,
    spec: ActionSpec,
    registry: Arc<Registry>,
    adapter: Arc<dyn Adapter>,
) -> impl Fn(
    Method,
    Path<HashMap<String, String>>,
    Query<HashMap<String, String>>,
    Option<Json<Value>>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone
       + Send
       + 'static {
    move |method: Method,
          Path(url_params): Path<HashMap<String, String>>,
          Query(query_args): Query<HashMap<String, String>>,
          body: Option<Json<Value>>| {
        let class = Arc::clone(&class);
        let spec = spec.clone();
        let registry = Arc::clone(&registry);
        let adapter = Arc::clone(&adapter);
        Box::pin(async move {
            let outcome = run_action(class, spec, registry, adapter, url_params, query_args, body)
                .await;
            match outcome {
                Ok(document) => {
                    let status = match method {
                        Method::POST => StatusCode::CREATED,
                        Method::DELETE => StatusCode::NO_CONTENT,
                        _ => StatusCode::OK,
                    };
                    (status, Json(document)).into_response()
                }
                Err(error) => {
                    tracing::debug!(error = %error, "action failed");
                    error.into_response()
                }
            }
        })
    }
}

async fn run_action(
    class: Arc<ResourceClass>,
    spec: ActionSpec,
    registry: Arc<Registry>,
    adapter: Arc<dyn Adapter>,
    url_params: HashMap<String, String>,
    query_args: HashMap<String, String>,
    body: Option<Json<Value>>,
) -> Result<Value, ApiError> {
    let mut input = ActionInput::default();
    for (key, value) in url_params {
        input.url_params.insert(key, Value::String(value));
    }
    for (key, value) in query_args {
        input.query_args.insert(key, Value::String(value));
    }
    if let Some(Json(Value::Object(map))) = body {
        input.body_args = map;
    }
    let input = if spec.fields.is_empty() {
        input
    } else {
        translate_and_validate(input, &spec.fields)?
    };
    tracing::debug!(resource = class.name(), "dispatching action");
    let instance = (spec.handler)(Arc::clone(&class), input).await?;
    adapter.serialize(&instance, &registry)
}
