//! JSON body extraction with validator-driven rejection.

use crate::errors::ErrorResponse;
use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that runs the body through `validator::Validate`.
///
/// A failing body is rejected with 400 and the standard [`ErrorResponse`]
/// envelope. `details` is keyed by field name so clients can attribute
/// each failure:
///
/// ```json
/// {
///   "error": "BadRequest",
///   "message": "Request validation failed",
///   "details": {
///     "password": [{"code": "length", "message": "Password must be at least 8 characters"}]
///   }
/// }
/// ```
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
///
/// async fn create_review(
///     ValidatedJson(input): ValidatedJson<CreateReview>,
/// ) -> impl IntoResponse {
///     // input.rating is already known to be within 1..=5
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| e.into_response())?;

        if let Err(errors) = data.validate() {
            return Err(validation_rejection(&errors));
        }

        Ok(ValidatedJson(data))
    }
}

/// Flattens validator output into the `details` object. The validator's
/// `params` carry the submitted values, so they are not echoed back;
/// request bodies can hold credentials.
fn validation_rejection(errors: &validator::ValidationErrors) -> Response {
    let details: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let entries: Vec<serde_json::Value> = field_errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(entries))
        })
        .collect();

    let body = ErrorResponse {
        error: "BadRequest".to_string(),
        message: "Request validation failed".to_string(),
        details: Some(serde_json::Value::Object(details)),
    };

    (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct SignupBody {
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
    }

    #[tokio::test]
    async fn test_rejection_names_field_without_echoing_value() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"password": "short"}"#))
            .unwrap();

        let response = ValidatedJson::<SignupBody>::from_request(request, &())
            .await
            .err()
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["details"]["password"].is_array());
        assert_eq!(
            body["details"]["password"][0]["message"],
            "Password must be at least 8 characters"
        );
        // The submitted value must not leak into the error body
        assert!(!body.to_string().contains("short"));
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"password": "long-enough-pass"}"#))
            .unwrap();

        let ValidatedJson(body) = ValidatedJson::<SignupBody>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(body.password, "long-enough-pass");
    }
}
