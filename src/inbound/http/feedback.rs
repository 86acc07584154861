//! Feedback wall endpoints.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::feedback::{RATING_MAX, RATING_MIN};
use crate::domain::ports::NewFeedback;
use crate::domain::{Error, Feedback, Identity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::{Authenticated, OwnerQuery};
use crate::inbound::http::state::HttpState;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 50;

/// Query string for the public wall.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackListQuery {
    /// 1-based page number.
    pub page: Option<u64>,
    /// Items per page, capped at 50.
    pub size: Option<i64>,
}

/// Body for posting feedback.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    /// Author identity; must match the credential.
    #[schema(value_type = String, example = "ada@example.com")]
    pub author_email: String,
    pub author_name: String,
    pub message: String,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
}

/// Public feedback wall, newest first.
#[utoipa::path(
    get,
    path = "/feedback",
    params(FeedbackListQuery),
    responses(
        (status = 200, description = "Feedback page", body = [Feedback]),
        (status = 400, description = "Invalid query", body = crate::inbound::http::ApiError)
    ),
    tags = ["feedback"],
    operation_id = "listFeedback"
)]
#[get("/feedback")]
pub async fn list_feedback(
    state: web::Data<HttpState>,
    query: web::Query<FeedbackListQuery>,
) -> ApiResult<web::Json<Vec<Feedback>>> {
    let page = query.page.unwrap_or(1);
    if page == 0 {
        return Err(Error::invalid_request("page starts at 1").into());
    }
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        return Err(
            Error::invalid_request(format!("size must be between 1 and {MAX_PAGE_SIZE}")).into(),
        );
    }

    let wall = state
        .feedback
        .page((page - 1).saturating_mul(size as u64), size)
        .await?;
    Ok(web::Json(wall))
}

/// Post feedback as the authenticated customer.
#[utoipa::path(
    post,
    path = "/feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Feedback posted", body = Feedback),
        (status = 400, description = "Invalid body", body = crate::inbound::http::ApiError),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError)
    ),
    tags = ["feedback"],
    operation_id = "createFeedback"
)]
#[post("/feedback")]
pub async fn create_feedback(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CreateFeedbackRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let author = Identity::new(payload.author_email.clone())
        .map_err(|error| Error::invalid_request(format!("authorEmail: {error}")))?;
    auth.require_owner(&author)?;

    if payload.message.trim().is_empty() {
        return Err(Error::invalid_request("message must not be empty").into());
    }
    if !(RATING_MIN..=RATING_MAX).contains(&payload.rating) {
        return Err(Error::invalid_request(format!(
            "rating must be between {RATING_MIN} and {RATING_MAX}"
        ))
        .into());
    }

    let entry = state
        .feedback
        .insert(NewFeedback {
            author_email: author,
            author_name: payload.author_name,
            message: payload.message,
            rating: payload.rating,
            created_at: Utc::now(),
        })
        .await?;
    Ok(HttpResponse::Created().json(entry))
}

/// Delete the authenticated author's own feedback.
#[utoipa::path(
    delete,
    path = "/feedback/{id}",
    params(("id" = String, Path, description = "Feedback id"), OwnerQuery),
    responses(
        (status = 204, description = "Feedback removed"),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError),
        (status = 404, description = "Not the author's entry", body = crate::inbound::http::ApiError)
    ),
    tags = ["feedback"],
    operation_id = "deleteFeedback"
)]
#[delete("/feedback/{id}")]
pub async fn delete_feedback(
    state: web::Data<HttpState>,
    auth: Authenticated,
    id: web::Path<String>,
    query: web::Query<OwnerQuery>,
) -> ApiResult<HttpResponse> {
    let author = query.identity()?;
    auth.require_owner(&author)?;
    state.feedback.delete(&id, &author).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use crate::domain::{SigningSecret, credential};
    use crate::inbound::http::guard::{CookiePolicy, GuardSettings, TOKEN_COOKIE};

    fn state() -> web::Data<HttpState> {
        web::Data::new(HttpState::in_memory(GuardSettings {
            secret: SigningSecret::new("0123456789abcdef0123456789abcdef").expect("secret"),
            cookies: CookiePolicy::development(),
        }))
    }

    fn token(state: &web::Data<HttpState>, email: &str) -> Cookie<'static> {
        let identity = Identity::new(email).expect("identity");
        let token = credential::issue(&identity, &state.guard.secret, Utc::now()).expect("issue");
        Cookie::new(TOKEN_COOKIE, token)
    }

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .service(list_feedback)
            .service(create_feedback)
            .service(delete_feedback)
    }

    fn entry_body(rating: i32) -> Value {
        json!({
            "authorEmail": "ada@example.com",
            "authorName": "Ada",
            "message": "The kacchi was excellent.",
            "rating": rating,
        })
    }

    #[actix_web::test]
    async fn wall_is_public_and_posting_is_not() {
        let shared = state();
        let app = test::init_service(test_app(shared.clone())).await;

        let wall =
            test::call_service(&app, test::TestRequest::get().uri("/feedback").to_request()).await;
        assert_eq!(wall.status(), StatusCode::OK);

        let anonymous = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/feedback")
                .set_json(entry_body(5))
                .to_request(),
        )
        .await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn post_then_read_back_on_the_wall() {
        let shared = state();
        let app = test::init_service(test_app(shared.clone())).await;

        let posted = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/feedback")
                .cookie(token(&shared, "ada@example.com"))
                .set_json(entry_body(5))
                .to_request(),
        )
        .await;
        assert_eq!(posted.status(), StatusCode::CREATED);

        let wall =
            test::call_service(&app, test::TestRequest::get().uri("/feedback").to_request()).await;
        let wall: Value = test::read_body_json(wall).await;
        assert_eq!(wall.as_array().expect("array").len(), 1);
        assert_eq!(wall[0]["authorEmail"], "ada@example.com");
    }

    #[actix_web::test]
    async fn posting_as_someone_else_is_forbidden() {
        let shared = state();
        let app = test::init_service(test_app(shared.clone())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/feedback")
                .cookie(token(&shared, "mallory@example.com"))
                .set_json(entry_body(5))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn out_of_range_rating_is_rejected() {
        let shared = state();
        let app = test::init_service(test_app(shared.clone())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/feedback")
                .cookie(token(&shared, "ada@example.com"))
                .set_json(entry_body(6))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delete_is_owner_scoped() {
        let shared = state();
        let app = test::init_service(test_app(shared.clone())).await;

        let posted = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/feedback")
                .cookie(token(&shared, "ada@example.com"))
                .set_json(entry_body(4))
                .to_request(),
        )
        .await;
        let posted: Value = test::read_body_json(posted).await;
        let id = posted["id"].as_str().expect("id").to_owned();

        let forbidden = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/feedback/{id}?email=ada%40example.com"))
                .cookie(token(&shared, "mallory@example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let removed = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/feedback/{id}?email=ada%40example.com"))
                .cookie(token(&shared, "ada@example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(removed.status(), StatusCode::NO_CONTENT);
    }
}
