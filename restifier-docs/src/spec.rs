//! Documentation artifact types

use restifier_validation::FieldDoc;
use serde::{Deserialize, Serialize};

/// Documentation for a deployed route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDocumentation {
    /// Path the documentation is served at
    pub api_base: String,
    /// Free-form overview text
    pub api_overview: String,
    pub routes: Vec<RouteDoc>,
}

impl ApiDocumentation {
    /// Look up a documented route
    pub fn route(&self, method: &str, path: &str) -> Option<&RouteDoc> {
        self.routes
            .iter()
            .find(|r| r.path == path && r.method.eq_ignore_ascii_case(method))
    }
}

/// Documentation for one bound route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDoc {
    pub path: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Name of the input schema
    pub input: String,
    /// Name of the output schema
    pub output: String,
    pub input_fields: Vec<FieldDoc>,
    pub output_fields: Vec<FieldDoc>,
}
