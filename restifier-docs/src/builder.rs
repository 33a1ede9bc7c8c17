//! Builder for documentation artifacts

use crate::spec::*;
use restifier_core::HttpMethod;
use restifier_validation::{ApiRoute, Binding, RouteTable};

/// Builds an [`ApiDocumentation`] from explicit route descriptors
#[derive(Debug, Clone)]
pub struct DocsBuilder {
    doc: ApiDocumentation,
}

impl DocsBuilder {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            doc: ApiDocumentation {
                api_base: api_base.into(),
                api_overview: String::new(),
                routes: Vec::new(),
            },
        }
    }

    /// Set the overview text
    pub fn overview(mut self, overview: impl Into<String>) -> Self {
        self.doc.api_overview = overview.into();
        self
    }

    /// Document one bound route
    pub fn binding(
        mut self,
        method: HttpMethod,
        path: impl Into<String>,
        binding: &Binding,
        description: Option<String>,
    ) -> Self {
        self.doc.routes.push(RouteDoc {
            path: path.into(),
            method: method.as_str().to_string(),
            description,
            input: binding.input.name().to_string(),
            output: binding.output.name().to_string(),
            input_fields: binding.input.to_docs(),
            output_fields: binding.output.to_docs(),
        });
        self
    }

    /// Document a route if it carries binding metadata
    pub fn route(self, route: &ApiRoute) -> Self {
        match &route.binding {
            Some(binding) => self.binding(
                route.method,
                route.path.clone(),
                binding,
                route.description.clone(),
            ),
            None => self,
        }
    }

    /// Document every bound route of a table, in table order
    pub fn routes(self, table: &RouteTable) -> Self {
        table.routes().iter().fold(self, |builder, route| builder.route(route))
    }

    pub fn build(self) -> ApiDocumentation {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restifier_core::{Error, HttpRequest, HttpResponse};
    use restifier_validation::{MessageSchema, Property, api, required};

    fn table() -> RouteTable {
        let input = MessageSchema::builder("HelloInput")
            .property(Property::string("name").validator(required()).description("Who to greet"))
            .build()
            .unwrap();
        let output = MessageSchema::builder("HelloOutput")
            .property(Property::string("greeting"))
            .build()
            .unwrap();

        RouteTable::new(vec![
            ApiRoute::api(HttpMethod::POST, "/hello", api(input, output, |m| Ok(m.into())))
                .describe("Say hello"),
            ApiRoute::plain(HttpMethod::GET, "/health", |_req: HttpRequest| -> Result<HttpResponse, Error> {
                Ok(HttpResponse::ok())
            }),
        ])
    }

    #[test]
    fn test_builder_defaults() {
        let doc = DocsBuilder::new("/api").build();
        assert_eq!(doc.api_base, "/api");
        assert!(doc.api_overview.is_empty());
        assert!(doc.routes.is_empty());
    }

    #[test]
    fn test_only_bound_routes_are_documented() {
        let doc = DocsBuilder::new("/api")
            .overview("Greeting service")
            .routes(&table())
            .build();

        assert_eq!(doc.api_overview, "Greeting service");
        assert_eq!(doc.routes.len(), 1);

        let route = doc.route("post", "/hello").unwrap();
        assert_eq!(route.method, "POST");
        assert_eq!(route.description.as_deref(), Some("Say hello"));
        assert_eq!(route.input, "HelloInput");
        assert_eq!(route.input_fields[0].name, "name");
        assert!(route.input_fields[0].required);
        assert_eq!(route.output_fields[0].name, "greeting");
        assert!(doc.route("GET", "/health").is_none());
    }
}
