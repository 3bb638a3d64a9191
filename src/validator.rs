use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
};
use lectern_core::AppError;
use lectern_rbac::{Missing, ResourceId, parse_id};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

/// JSON body extractor that also runs `validator` rules.
///
/// Missing or ill-typed fields are rejected with 400, rule violations with 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return AppError::bad_request(anyhow!("{} is required", field));
                }

                if error_msg.contains("invalid type") || error_msg.contains("invalid value") {
                    return AppError::bad_request(anyhow!("Invalid field type in request"));
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(anyhow!(
                        "Missing 'Content-Type: application/json' header"
                    ));
                }

                AppError::bad_request(anyhow!("Invalid request body"))
            })?;

        value.validate().map_err(|errors| {
            AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                anyhow!("{}", format_errors(&errors)),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Single resource id taken from the path.
///
/// A segment that is not a well-formed id is answered like any other missing
/// resource: 404 naming the entity.
#[derive(Debug, Clone, Copy)]
pub struct ResourcePath<I>(pub I);

impl<I, S> FromRequestParts<S> for ResourcePath<I>
where
    I: ResourceId + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow!(rejection.body_text())))?;

        parse_id(&raw)
            .map(ResourcePath)
            .map_err(Missing::into_app_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::{Router, routing::get};
    use lectern_models::AssignmentId;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Content is required"))]
        content: String,
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidatedJson(payload) =
            ValidatedJson::<Payload>::from_request(request(r#"{"content": "answer"}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.content, "answer");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = ValidatedJson::<Payload>::from_request(request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "content is required");
    }

    #[tokio::test]
    async fn test_rule_violation_is_unprocessable() {
        let err = ValidatedJson::<Payload>::from_request(request(r#"{"content": ""}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "Content is required");
    }

    async fn echo(ResourcePath(id): ResourcePath<AssignmentId>) -> String {
        id.to_string()
    }

    async fn status_of(uri: &str) -> StatusCode {
        let app = Router::new().route("/assignments/{id}", get(echo));
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_resource_path_accepts_uuid() {
        let uri = format!("/assignments/{}", AssignmentId::new());
        assert_eq!(status_of(&uri).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_resource_path_unparsable_id_is_not_found() {
        assert_eq!(status_of("/assignments/missing123").await, StatusCode::NOT_FOUND);
    }
}
