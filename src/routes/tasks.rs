use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{ListQuery, TaskInput, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Retrieves a page of the authenticated user's tasks.
///
/// Tasks are ordered by id, so repeated calls page through a stable sequence.
///
/// ## Query Parameters:
/// - `offset` (optional, default 0): Number of tasks to skip.
/// - `limit` (optional, default 100, max 1000): Maximum number of tasks to return.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Task` objects.
/// - `401 Unauthorized`: Missing, invalid or expired token.
/// - `422 Unprocessable Entity`: Out-of-range pagination values.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    CurrentUser(owner): CurrentUser,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    query.validate()?;

    let tasks = state.tasks.list(&owner, query.offset(), query.limit()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user. `completed` starts as `false`.
///
/// ## Responses:
/// - `200 OK`: Returns the created `Task`.
/// - `401 Unauthorized`: Missing, invalid or expired token.
/// - `422 Unprocessable Entity`: Title or description fails validation.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    CurrentUser(owner): CurrentUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state.tasks.create(&owner, &task_data).await?;
    log::debug!("User {} created task {}", owner.id(), task.id);
    Ok(HttpResponse::Ok().json(task))
}

/// Retrieves one task owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: Returns the `Task`.
/// - `404 Not Found`: No such task, or it belongs to someone else.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    CurrentUser(owner): CurrentUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get(&owner, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces the title, description and completion flag of an owned task.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task`.
/// - `404 Not Found`: No such task, or it belongs to someone else.
/// - `422 Unprocessable Entity`: Title or description fails validation.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    CurrentUser(owner): CurrentUser,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .update(&owner, task_id.into_inner(), &task_data)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes an owned task.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `404 Not Found`: No such task, or it belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    CurrentUser(owner): CurrentUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    state.tasks.delete(&owner, task_id).await?;
    log::debug!("User {} deleted task {}", owner.id(), task_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully"
    })))
}

