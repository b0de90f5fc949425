use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use pdftree::{
    fetch_tree_file, resolve_object_file, ErrorEnvelope, InspectOptions, ResolutionMode,
    ResolveDepth, TreeError, TreeRequest, MAX_NESTING_DEPTH,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

pub const GET_OBJECT_TREE: &str = "get_pdf_object_tree";
pub const RESOLVE_INDIRECT_OBJECT: &str = "resolve_indirect_object";

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Address the server binds to
    pub addr: String,
    /// Nesting limit handed to every tool call
    pub max_depth: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            addr: DEFAULT_ADDR.to_string(),
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

impl ApiConfig {
    /// Read `PDFTREE_API_ADDR` and `PDFTREE_MAX_DEPTH` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ApiConfig::default();
        if let Some(addr) = lookup("PDFTREE_API_ADDR") {
            config.addr = addr;
        }
        if let Some(raw) = lookup("PDFTREE_MAX_DEPTH") {
            config.max_depth = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|depth| *depth > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: "PDFTREE_MAX_DEPTH",
                    value: raw,
                })?;
        }
        Ok(config)
    }

    pub fn inspect_options(&self) -> InspectOptions {
        InspectOptions {
            max_depth: self.max_depth,
        }
    }
}

/// Arguments of `get_pdf_object_tree`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ObjectTreeArgs {
    pub pdf_path: String,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub mode: ResolutionMode,
}

/// Arguments of `resolve_indirect_object`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResolveObjectArgs {
    pub pdf_path: String,
    pub object_id: String,
    #[serde(default)]
    pub depth: ResolveDepth,
}

/// Name, description and JSON schema of an invocable tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    #[serde(flatten)]
    pub envelope: ErrorEnvelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    pub kind: String,
}

/// Application-specific error types for the API
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
    #[error("{tool} failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: TreeError,
    },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::UnknownTool(_) => StatusCode::NOT_FOUND,
            AppError::InvalidArguments { .. } => StatusCode::BAD_REQUEST,
            AppError::Tool { source, .. } => match source {
                TreeError::DocumentAccess { .. } | TreeError::ObjectNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                TreeError::InvalidObjectId { .. } | TreeError::InvalidPath(_) => {
                    StatusCode::BAD_REQUEST
                }
                TreeError::Parsing(_) | TreeError::RecursionLimit { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                TreeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::UnknownTool(name) => ErrorResponse {
                envelope: ErrorEnvelope {
                    error: format!("Unknown tool: {name}"),
                    details: Some(format!(
                        "Available tools: {GET_OBJECT_TREE}, {RESOLVE_INDIRECT_OBJECT}"
                    )),
                },
                tool: Some(name),
                kind: "unknown_tool".to_string(),
            },
            AppError::InvalidArguments { tool, message } => ErrorResponse {
                envelope: ErrorEnvelope {
                    error: format!("Invalid arguments for {tool}"),
                    details: Some(message),
                },
                tool: Some(tool),
                kind: "validation".to_string(),
            },
            AppError::Tool { tool, source } => ErrorResponse {
                envelope: ErrorEnvelope::from(&source),
                tool: Some(tool),
                kind: source.kind().to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router with the default configuration
pub fn app() -> Router {
    app_with_config(&ApiConfig::default())
}

/// Build the application router with all routes configured
pub fn app_with_config(config: &ApiConfig) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/{name}", post(call_tool))
        .with_state(config.inspect_options())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "pdftree API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// List the invocable tools with their input schemas
pub async fn list_tools() -> Json<Vec<ToolDescriptor>> {
    Json(tool_descriptors())
}

pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: GET_OBJECT_TREE.to_string(),
            description: "Serialize the object tree of a PDF, starting at the document \
                          catalog or at a given object, optionally following a dotted path \
                          such as 'Pages.Kids.0'. In lazy mode indirect references stay \
                          pointers; in full mode every reachable object is returned once \
                          in indirect_objects."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "pdf_path": {
                        "type": "string",
                        "description": "Path to the PDF file"
                    },
                    "object_id": {
                        "type": "string",
                        "description": "Start at this object instead of the catalog, e.g. '1 0'"
                    },
                    "path": {
                        "type": "string",
                        "description": "Dotted path to follow, e.g. 'Pages.Kids.0'"
                    },
                    "mode": {
                        "type": "string",
                        "enum": ["lazy", "full"],
                        "default": "lazy",
                        "description": "How indirect references are resolved"
                    }
                },
                "required": ["pdf_path"]
            }),
        },
        ToolDescriptor {
            name: RESOLVE_INDIRECT_OBJECT.to_string(),
            description: "Resolve a single indirect object by id. Shallow resolution \
                          returns its direct properties; deep resolution also returns every \
                          object it reaches in indirect_objects."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "pdf_path": {
                        "type": "string",
                        "description": "Path to the PDF file"
                    },
                    "object_id": {
                        "type": "string",
                        "description": "Object identifier, e.g. '1-0'"
                    },
                    "depth": {
                        "type": "string",
                        "enum": ["shallow", "deep"],
                        "default": "shallow",
                        "description": "Whether referenced objects are expanded too"
                    }
                },
                "required": ["pdf_path", "object_id"]
            }),
        },
    ]
}

/// Invoke a tool by name with JSON arguments
pub async fn call_tool(
    State(options): State<InspectOptions>,
    Path(name): Path<String>,
    arguments: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    info!(tool = %name, "tool invoked");

    let outcome = match name.as_str() {
        GET_OBJECT_TREE => {
            let args: ObjectTreeArgs = parse_arguments(&name, arguments)?;
            run_blocking(move || {
                let request = TreeRequest {
                    object_id: args.object_id,
                    path: args.path,
                    mode: args.mode,
                };
                fetch_tree_file(&args.pdf_path, &request, &options).and_then(to_json)
            })
            .await
        }
        RESOLVE_INDIRECT_OBJECT => {
            let args: ResolveObjectArgs = parse_arguments(&name, arguments)?;
            run_blocking(move || {
                resolve_object_file(&args.pdf_path, &args.object_id, args.depth, &options)
                    .and_then(to_json)
            })
            .await
        }
        _ => return Err(AppError::UnknownTool(name.clone())),
    };

    outcome
        .map(Json)
        .map_err(|source| AppError::Tool { tool: name, source })
}

/// Body rejections (missing content type, malformed JSON) are reported in the
/// same envelope as arguments of the wrong shape.
fn parse_arguments<T: serde::de::DeserializeOwned>(
    tool: &str,
    arguments: Result<Json<Value>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(arguments) = arguments.map_err(|rejection| AppError::InvalidArguments {
        tool: tool.to_string(),
        message: rejection.body_text(),
    })?;
    serde_json::from_value(arguments).map_err(|e| AppError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

fn to_json<T: Serialize>(response: T) -> Result<Value, TreeError> {
    serde_json::to_value(response).map_err(|e| TreeError::Internal(e.to_string()))
}

/// Run file-backed work off the async executor
async fn run_blocking<F>(work: F) -> Result<Value, TreeError>
where
    F: FnOnce() -> Result<Value, TreeError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(join_error) => {
            error!(error = %join_error, "tool task did not complete");
            Err(TreeError::Internal(join_error.to_string()))
        }
    }
}
