use crate::{
    auth::AuthenticatedUserId, error::AppError, models::TaskInput, tasks::TaskStore,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;

/// Retrieves the authenticated user's tasks.
///
/// Tasks come back in the order they were created, with descriptions decrypted.
///
/// ## Responses:
/// - `200 OK`: `{"tasks": [{"id", "title", "description"}]}`.
/// - `401 Unauthorized`: If the request lacks a valid access token.
/// - `500 Internal Server Error`: If a stored description cannot be decrypted.
#[get("")]
pub async fn list_tasks(
    store: web::Data<TaskStore>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    store.open(user.0).await?;
    let tasks = store.list(user.0).await?;

    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// - `title`: 3 to 100 characters after trimming.
/// - `description`: at least 5 characters after trimming; markup is stripped.
///
/// ## Responses:
/// - `201 Created`: `{"message", "task"}` with the plaintext description.
/// - `400 Bad Request`: If validation fails.
/// - `401 Unauthorized`: If the request lacks a valid access token.
#[post("")]
pub async fn create_task(
    store: web::Data<TaskStore>,
    user: AuthenticatedUserId,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    store.open(user.0).await?;
    let task = store.create(user.0, task_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully.",
        "task": task
    })))
}

/// Deletes one of the authenticated user's tasks.
///
/// Deleting an id that does not exist (or belongs to someone else) changes
/// nothing and still answers `200 OK`.
///
/// ## Path Parameters:
/// - `id`: The id of the task to delete.
///
/// ## Responses:
/// - `200 OK`: `{"message"}`.
/// - `401 Unauthorized`: If the request lacks a valid access token.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<TaskStore>,
    user: AuthenticatedUserId,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    store.open(user.0).await?;
    store.delete(user.0, &task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionAuthority;
    use crate::config::AuthConfig;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    #[actix_rt::test]
    async fn test_task_routes_require_a_token() {
        let mut config = AuthConfig::new("access", "refresh");
        config.bcrypt_cost = 4;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(SessionAuthority::in_memory(&config)))
                .app_data(web::Data::new(TaskStore::in_memory("key")))
                .configure(crate::routes::config),
        )
        .await;

        let requests = vec![
            test::TestRequest::get().uri("/tasks"),
            test::TestRequest::post()
                .uri("/tasks")
                .set_json(json!({ "title": "Title", "description": "Description" })),
            test::TestRequest::delete().uri("/tasks/abc"),
            test::TestRequest::get()
                .uri("/tasks")
                .insert_header(("Authorization", "Bearer not-a-token")),
        ];

        for req in requests {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["message"].is_string());
        }
    }

    #[actix_rt::test]
    async fn test_handlers_use_the_extracted_user() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(TaskStore::in_memory("key")))
                .service(web::scope("/tasks").service(list_tasks).service(create_task)),
        )
        .await;

        // Without the middleware there is no user id, so the extractor refuses.
        let req = test::TestRequest::get().uri("/tasks").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
