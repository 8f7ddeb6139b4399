/// Root query and mutation resolvers
///
/// Each resolver makes at most one store call. Ids are parsed at this
/// boundary; not-found rows become `null`, never errors.

use crate::error::{ApiError, StoreError};
use crate::schema::context::GraphQLContext;
use crate::schema::ids::{id_argument, parse_id, required_id};
use crate::schema::types::{COMMENT, LINK};
use crate::store::{NewComment, NewLink};
use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, ResolverContext, TypeRef};
use async_graphql::ErrorExtensions;

/// Response of the `info` query
pub const INFO: &str = "This is the API of a Hackernews Clone";

fn store_error(err: StoreError) -> async_graphql::Error {
    ApiError::from(err).extend()
}

fn string_argument(ctx: &ResolverContext<'_>, name: &str) -> async_graphql::Result<String> {
    Ok(ctx.args.try_get(name)?.string()?.to_string())
}

/// `info: String!`
pub fn info_field() -> Field {
    Field::new("info", TypeRef::named_nn(TypeRef::STRING), |_ctx| {
        FieldFuture::new(async move { Ok(Some(FieldValue::value(INFO.to_string()))) })
    })
}

/// `feed(filterNeedle: String): [Link!]!`
pub fn feed_field() -> Field {
    Field::new("feed", TypeRef::named_nn_list_nn(LINK), |ctx| {
        FieldFuture::new(async move {
            let filter = match ctx.args.get("filterNeedle") {
                Some(needle) if !needle.is_null() => Some(needle.string()?.to_string()),
                _ => None,
            };

            let gql = ctx.data::<GraphQLContext>()?;
            let links = gql
                .store
                .find_links(filter.as_deref())
                .await
                .map_err(store_error)?;

            tracing::debug!("feed returned {} links (filter: {:?})", links.len(), filter);
            Ok(Some(FieldValue::list(links.into_iter().map(FieldValue::owned_any))))
        })
    })
    .argument(InputValue::new("filterNeedle", TypeRef::named(TypeRef::STRING)))
}

/// `comment(id: ID!): Comment`
pub fn comment_field() -> Field {
    Field::new("comment", TypeRef::named(COMMENT), |ctx| {
        FieldFuture::new(async move {
            let (_, id) = required_id(&ctx, "id")?;
            let gql = ctx.data::<GraphQLContext>()?;

            let comment = gql.store.find_comment(id).await.map_err(store_error)?;
            Ok(comment.map(FieldValue::owned_any))
        })
    })
    .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)))
}

/// `link(id: ID): Link`
pub fn link_field() -> Field {
    Field::new("link", TypeRef::named(LINK), |ctx| {
        FieldFuture::new(async move {
            let Some(raw) = id_argument(&ctx, "id")? else {
                return Ok(None);
            };
            let id = parse_id(&raw).map_err(|e| e.extend())?;
            let gql = ctx.data::<GraphQLContext>()?;

            let link = gql.store.find_link(id).await.map_err(store_error)?;
            Ok(link.map(FieldValue::owned_any))
        })
    })
    .argument(InputValue::new("id", TypeRef::named(TypeRef::ID)))
}

/// `postLink(url: String!, description: String!): Link!`
pub fn post_link_field() -> Field {
    Field::new("postLink", TypeRef::named_nn(LINK), |ctx| {
        FieldFuture::new(async move {
            let new_link = NewLink {
                url: string_argument(&ctx, "url")?,
                description: string_argument(&ctx, "description")?,
            };
            let gql = ctx.data::<GraphQLContext>()?;

            let link = gql.store.create_link(new_link).await.map_err(store_error)?;
            tracing::info!("Posted link {} ({})", link.id, link.url);
            Ok(Some(FieldValue::owned_any(link)))
        })
    })
    .argument(InputValue::new("url", TypeRef::named_nn(TypeRef::STRING)))
    .argument(InputValue::new("description", TypeRef::named_nn(TypeRef::STRING)))
}

/// `postCommentOnLink(linkId: ID!, body: String!): Comment!`
///
/// A `linkId` that names no link is reported back to the client by id; the
/// raw constraint failure is only logged.
pub fn post_comment_on_link_field() -> Field {
    Field::new("postCommentOnLink", TypeRef::named_nn(COMMENT), |ctx| {
        FieldFuture::new(async move {
            let (raw_link_id, link_id) = required_id(&ctx, "linkId")?;
            let new_comment = NewComment {
                body: string_argument(&ctx, "body")?,
                link_id: Some(link_id),
            };
            let gql = ctx.data::<GraphQLContext>()?;

            match gql.store.create_comment(new_comment).await {
                Ok(comment) => {
                    tracing::info!("Posted comment {} on link {}", comment.id, link_id);
                    Ok(Some(FieldValue::owned_any(comment)))
                }
                Err(StoreError::ForeignKeyViolation(detail)) => {
                    tracing::warn!("Rejected comment on link {}: {}", raw_link_id, detail);
                    Err(ApiError::LinkNotFound(raw_link_id).extend())
                }
                Err(err) => Err(store_error(err)),
            }
        })
    })
    .argument(InputValue::new("linkId", TypeRef::named_nn(TypeRef::ID)))
    .argument(InputValue::new("body", TypeRef::named_nn(TypeRef::STRING)))
}

/// All `Query` fields
pub fn query_fields() -> Vec<Field> {
    vec![info_field(), feed_field(), comment_field(), link_field()]
}

/// All `Mutation` fields
pub fn mutation_fields() -> Vec<Field> {
    vec![post_link_field(), post_comment_on_link_field()]
}
