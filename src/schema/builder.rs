/// GraphQL schema builder
///
/// This module provides the `SchemaBuilder` which assembles the Hackernews
/// schema: the `Query` and `Mutation` roots, the `Link` and `Comment` object
/// types and the `DateTime` scalar.

use crate::error::{HackernewsError, Result};
use crate::schema::resolver::{mutation_fields, query_fields};
use crate::schema::scalars::register_custom_scalars;
use crate::schema::types::{comment_type, link_type};

use async_graphql::dynamic::{Object, Schema};

/// Schema builder for the Hackernews API
pub struct SchemaBuilder {
    /// Reject queries nested deeper than this
    max_depth: Option<usize>,
    introspection: bool,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self {
            max_depth: None,
            introspection: true,
        }
    }

    /// Limit query depth, e.g. to stop `link { comments { link { comments ... } } }` chains
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn disable_introspection(mut self) -> Self {
        self.introspection = false;
        self
    }

    /// Build the complete GraphQL schema
    ///
    /// The schema carries no data of its own; every request must attach a
    /// [`GraphQLContext`](crate::schema::GraphQLContext) built with
    /// [`create_context`](crate::schema::create_context).
    pub fn build_schema(&self) -> Result<Schema> {
        let query = query_fields()
            .into_iter()
            .fold(Object::new("Query"), |object, field| object.field(field));

        let mutation = mutation_fields()
            .into_iter()
            .fold(Object::new("Mutation"), |object, field| object.field(field));

        let mut schema_builder = Schema::build(query.type_name(), Some(mutation.type_name()), None);

        for scalar in register_custom_scalars() {
            schema_builder = schema_builder.register(scalar);
        }

        schema_builder = schema_builder
            .register(link_type())
            .register(comment_type())
            .register(query)
            .register(mutation);

        if let Some(depth) = self.max_depth {
            schema_builder = schema_builder.limit_depth(depth);
        }
        if !self.introspection {
            schema_builder = schema_builder.disable_introspection();
        }

        let schema = schema_builder.finish().map_err(|e| {
            HackernewsError::SchemaGeneration(format!("Failed to build schema: {}", e))
        })?;

        tracing::debug!("GraphQL schema built");
        Ok(schema)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
