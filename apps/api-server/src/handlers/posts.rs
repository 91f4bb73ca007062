//! Post resource handlers.

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use blog_core::domain::{Post, PostInput};
use blog_shared::ApiResponse;
use blog_shared::dto::{PostRequest, PostResponse};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        user_id: post.user_id.to_string(),
        title: post.title,
        desc: post.desc,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

/// Fallible body: the actor is resolved before any payload error surfaces.
type PostBody = Result<web::Json<PostRequest>, actix_web::Error>;

fn post_input(body: PostBody) -> AppResult<PostInput> {
    let req = body.map_err(body_error)?.into_inner();
    Ok(PostInput {
        title: req.title,
        desc: req.desc,
    })
}

fn body_error(err: actix_web::Error) -> AppError {
    match err.as_error::<AppError>() {
        Some(AppError::BadRequest(detail)) => AppError::BadRequest(detail.clone()),
        _ => AppError::BadRequest(err.to_string()),
    }
}

/// GET /posts
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .posts
        .list()
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /posts/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.show(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// POST /posts
pub async fn store(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: PostBody,
) -> AppResult<HttpResponse> {
    let actor = identity.actor().ok_or(AppError::Unauthenticated)?;
    let post = state.posts.create(Some(actor), post_input(body)?).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/posts/{}", post.id)))
        .json(ApiResponse::ok_with_message(
            post_response(post),
            "Post created",
        )))
}

/// PUT /posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: PostBody,
) -> AppResult<HttpResponse> {
    let actor = identity.actor().ok_or(AppError::Unauthenticated)?;
    let post = state
        .posts
        .update(Some(actor), path.into_inner(), post_input(body)?)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post_response(post),
        "Post updated",
    )))
}

/// DELETE /posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, http::header, test};
    use blog_core::domain::{Actor, PostInput};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::handlers::test_support;
    use crate::state::AppState;

    async fn seed(state: &AppState, owner: Uuid) -> Uuid {
        state
            .posts
            .create(Some(Actor::new(owner)), PostInput::new("Hi", "World"))
            .await
            .unwrap()
            .id
    }

    #[actix_web::test]
    async fn test_index_lists_posts() {
        let state = test_support::state();
        seed(&state, Uuid::new_v4()).await;
        let app = test_app!(state);

        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/posts").to_request())
                .await;

        let titles: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert!(titles.contains(&"Hi"));
    }

    #[actix_web::test]
    async fn test_show_returns_title_and_desc() {
        let state = test_support::state();
        let id = seed(&state, Uuid::new_v4()).await;
        let app = test_app!(state);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/posts/{id}"))
                .to_request(),
        )
        .await;

        assert_eq!(body["data"]["title"], "Hi");
        assert_eq!(body["data"]["desc"], "World");
    }

    #[actix_web::test]
    async fn test_show_unknown_or_malformed_id_is_not_found() {
        let state = test_support::state();
        let app = test_app!(state);

        for uri in [format!("/posts/{}", Uuid::new_v4()), "/posts/abc".to_string()] {
            let resp =
                test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[actix_web::test]
    async fn test_store_without_login_redirects() {
        let state = test_support::state();
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({"title": "Hi", "desc": "World"}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
        assert!(state.posts.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_store_without_login_redirects_before_reading_body() {
        let state = test_support::state();
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .set_form([("title", "Hi"), ("desc", "World")])
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
        assert!(state.posts.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_store_rejects_non_json_body_from_logged_in_user() {
        let state = test_support::state();
        let (_, auth) = test_support::login_as(&state);
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .insert_header(auth)
                .set_form([("title", "Hi"), ("desc", "World")])
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 400);
        assert!(state.posts.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_store_creates_owned_post() {
        let state = test_support::state();
        let (user_id, auth) = test_support::login_as(&state);
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .insert_header(auth)
                .set_json(json!({"title": "Hi", "desc": "World"}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string();
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["user_id"], user_id.to_string());
        assert_eq!(location, format!("/posts/{}", body["data"]["id"].as_str().unwrap()));
    }

    #[actix_web::test]
    async fn test_store_reports_missing_fields() {
        let state = test_support::state();
        let (_, auth) = test_support::login_as(&state);
        let app = test_app!(state);

        for (payload, field) in [
            (json!({"desc": "World"}), "title"),
            (json!({"title": "Hi"}), "desc"),
        ] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/posts")
                    .insert_header(auth.clone())
                    .set_json(payload)
                    .to_request(),
            )
            .await;

            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["errors"][field].is_array(), "missing {field} error");
        }

        assert!(state.posts.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_owner_update_persists() {
        let state = test_support::state();
        let (owner, auth) = test_support::login_as(&state);
        let id = seed(&state, owner).await;
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/posts/{id}"))
                .insert_header(auth)
                .set_json(json!({"title": "updated title", "desc": "World"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let stored = state.posts.show(id).await.unwrap();
        assert_eq!(stored.title, "updated title");
        assert_eq!(stored.user_id, owner);
    }

    #[actix_web::test]
    async fn test_non_owner_update_is_forbidden() {
        let state = test_support::state();
        let id = seed(&state, Uuid::new_v4()).await;
        let (_, auth) = test_support::login_as(&state);
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/posts/{id}"))
                .insert_header(auth)
                .set_json(json!({"title": "hacked", "desc": "World"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/posts/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(body["data"]["title"], "Hi");
    }

    #[actix_web::test]
    async fn test_update_without_login_or_body_redirects() {
        let state = test_support::state();
        let id = seed(&state, Uuid::new_v4()).await;
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/posts/{id}"))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
        assert_eq!(state.posts.show(id).await.unwrap().title, "Hi");
    }

    #[actix_web::test]
    async fn test_owner_delete_removes_post() {
        let state = test_support::state();
        let (owner, auth) = test_support::login_as(&state);
        let id = seed(&state, owner).await;
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/posts/{id}"))
                .insert_header(auth)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/posts/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_non_owner_delete_is_forbidden() {
        let state = test_support::state();
        let id = seed(&state, Uuid::new_v4()).await;
        let (_, auth) = test_support::login_as(&state);
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/posts/{id}"))
                .insert_header(auth)
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(state.posts.show(id).await.is_ok());
    }

    #[actix_web::test]
    async fn test_unauthenticated_delete_redirects() {
        let state = test_support::state();
        let id = seed(&state, Uuid::new_v4()).await;
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/posts/{id}"))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert!(state.posts.show(id).await.is_ok());
    }
}
