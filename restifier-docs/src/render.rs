//! HTML, JSON and YAML renderings of the documentation artifact

use crate::spec::{ApiDocumentation, RouteDoc};
use restifier_core::{Error, HttpResponse};
use restifier_validation::FieldDoc;
use std::fmt::Write;

impl ApiDocumentation {
    /// The artifact as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize docs: {}", e)))
    }

    /// The artifact as YAML
    pub fn to_yaml(&self) -> Result<String, Error> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize docs: {}", e)))
    }

    /// A standalone HTML page describing every route
    pub fn to_html(&self, title: &str) -> String {
        let mut routes = String::new();
        for route in &self.routes {
            render_route(&mut routes, route);
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: sans-serif; margin: 2em; }}
        table {{ border-collapse: collapse; margin-bottom: 1em; }}
        th, td {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; }}
        .method {{ font-weight: bold; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <p class="overview">{overview}</p>
{routes}</body>
</html>"#,
            title = escape_html(title),
            overview = escape_html(&self.api_overview),
            routes = routes,
        )
    }
}

fn render_route(out: &mut String, route: &RouteDoc) {
    let _ = writeln!(
        out,
        r#"    <section class="route">
    <h2><span class="method">{}</span> {}</h2>"#,
        escape_html(&route.method),
        escape_html(&route.path)
    );
    if let Some(description) = &route.description {
        let _ = writeln!(out, "    <p>{}</p>", escape_html(description));
    }
    let _ = writeln!(out, "    <h3>Input: {}</h3>", escape_html(&route.input));
    render_fields(out, &route.input_fields);
    let _ = writeln!(out, "    <h3>Output: {}</h3>", escape_html(&route.output));
    render_fields(out, &route.output_fields);
    out.push_str("    </section>\n");
}

fn render_fields(out: &mut String, fields: &[FieldDoc]) {
    if fields.is_empty() {
        out.push_str("    <p><em>No fields</em></p>\n");
        return;
    }

    out.push_str(
        "    <table>\n    <tr><th>Name</th><th>Type</th><th>Repeated</th><th>Required</th><th>Description</th></tr>\n",
    );
    for field in fields {
        let kind = match &field.message {
            Some(message) => format!("{} ({})", field.kind, message),
            None => field.kind.clone(),
        };
        let _ = writeln!(
            out,
            "    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&field.name),
            escape_html(&kind),
            yes_no(field.repeated),
            yes_no(field.required),
            escape_html(&field.description)
        );
    }
    out.push_str("    </table>\n");

    for field in fields.iter().filter(|f| !f.fields.is_empty()) {
        let _ = writeln!(
            out,
            "    <h4>{}</h4>",
            escape_html(field.message.as_deref().unwrap_or(&field.name))
        );
        render_fields(out, &field.fields);
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// HTML documentation page response
pub fn html_response(doc: &ApiDocumentation, title: &str) -> HttpResponse {
    HttpResponse::html(doc.to_html(title))
}

/// JSON documentation response
pub fn json_response(doc: &ApiDocumentation) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::ok()
        .content_type("application/json")
        .with_body(doc.to_json()?.into_bytes()))
}

/// YAML documentation response
pub fn yaml_response(doc: &ApiDocumentation) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::ok()
        .content_type("application/x-yaml")
        .with_body(doc.to_yaml()?.into_bytes()))
}
