//! # pdftree-api
//!
//! REST API server exposing pdftree's object tree operations as tools
//!

mod api;
pub use api::{
    app, app_with_config, call_tool, health_check, list_tools, tool_descriptors, ApiConfig,
    AppError, ConfigError, ErrorResponse, ObjectTreeArgs, ResolveObjectArgs, ToolDescriptor,
    GET_OBJECT_TREE, RESOLVE_INDIRECT_OBJECT,
};
