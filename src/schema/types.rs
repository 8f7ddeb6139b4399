/// `Link` and `Comment` object types
///
/// Scalar fields project straight off the parent row. The two relation
/// fields issue a store call, either directly (one per parent) or through the
/// request's data loaders when batching is on.

use crate::error::ApiError;
use crate::schema::context::GraphQLContext;
use crate::schema::ids::format_id;
use crate::schema::scalars::{format_datetime, DATE_TIME};
use crate::store::{Comment, Link};
use async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, TypeRef};
use async_graphql::{ErrorExtensions, Value};
use std::any::Any;

pub const LINK: &str = "Link";
pub const COMMENT: &str = "Comment";

/// Field that reads a value off a parent of type `T`
fn projection<T>(name: &str, type_ref: TypeRef, project: fn(&T) -> Value) -> Field
where
    T: Any + Send + Sync,
{
    Field::new(name, type_ref, move |ctx| {
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<T>()?;
            Ok(Some(FieldValue::value(project(parent))))
        })
    })
}

pub fn link_type() -> Object {
    Object::new(LINK)
        .description("A submitted URL with a description")
        .field(projection::<Link>("id", TypeRef::named_nn(TypeRef::ID), |link| {
            format_id(link.id)
        }))
        .field(projection::<Link>(
            "description",
            TypeRef::named_nn(TypeRef::STRING),
            |link| Value::String(link.description.clone()),
        ))
        .field(projection::<Link>("url", TypeRef::named_nn(TypeRef::STRING), |link| {
            Value::String(link.url.clone())
        }))
        .field(link_comments_field())
        .field(projection::<Link>("createdAt", TypeRef::named_nn(DATE_TIME), |link| {
            format_datetime(&link.created_at)
        }))
}

pub fn comment_type() -> Object {
    Object::new(COMMENT)
        .description("A text reply attached to a link")
        .field(projection::<Comment>("id", TypeRef::named_nn(TypeRef::ID), |comment| {
            format_id(comment.id)
        }))
        .field(projection::<Comment>(
            "body",
            TypeRef::named_nn(TypeRef::STRING),
            |comment| Value::String(comment.body.clone()),
        ))
        .field(comment_link_field())
        .field(projection::<Comment>(
            "createdAt",
            TypeRef::named_nn(DATE_TIME),
            |comment| format_datetime(&comment.created_at),
        ))
}

/// `Link.comments: [Comment!]!`
fn link_comments_field() -> Field {
    Field::new("comments", TypeRef::named_nn_list_nn(COMMENT), |ctx| {
        FieldFuture::new(async move {
            let link_id = ctx.parent_value.try_downcast_ref::<Link>()?.id;
            let gql = ctx.data::<GraphQLContext>()?;

            let comments = match &gql.loaders {
                Some(loaders) => loaders
                    .comments_by_link
                    .load_one(link_id)
                    .await
                    .map_err(|e| ApiError::Batch(e).extend())?
                    .unwrap_or_default(),
                None => gql
                    .store
                    .find_comments_by_link(link_id)
                    .await
                    .map_err(|e| ApiError::from(e).extend())?,
            };

            Ok(Some(FieldValue::list(
                comments.into_iter().map(FieldValue::owned_any),
            )))
        })
    })
}

/// `Comment.link: Link`
fn comment_link_field() -> Field {
    Field::new("link", TypeRef::named(LINK), |ctx| {
        FieldFuture::new(async move {
            let Some(link_id) = ctx.parent_value.try_downcast_ref::<Comment>()?.link_id else {
                return Ok(None);
            };
            let gql = ctx.data::<GraphQLContext>()?;

            let link = match &gql.loaders {
                Some(loaders) => loaders
                    .links
                    .load_one(link_id)
                    .await
                    .map_err(|e| ApiError::Batch(e).extend())?,
                None => gql
                    .store
                    .find_link(link_id)
                    .await
                    .map_err(|e| ApiError::from(e).extend())?,
            };

            Ok(link.map(FieldValue::owned_any))
        })
    })
}
