use crate::dto::{ResponseData, TaskDetails, RESPONSE_INTERNAL_ERROR, RESPONSE_OK};
use crate::pool::Db;
use referral_db_entity::db::tasks::{Column as TaskColumn, Entity as Tasks};
use rocket::serde::json::Json;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use sea_orm_rocket::Connection;
use tracing::error;

#[get("/tasks", format = "application/json")]
pub async fn list(conn: Connection<'_, Db>) -> Json<ResponseData<Vec<TaskDetails>>> {
    let db = conn.into_inner();
    let tasks = Tasks::find()
        .filter(TaskColumn::IsActive.eq(true))
        .order_by_asc(TaskColumn::TaskId)
        .all(db)
        .await;
    match tasks {
        Ok(tasks) => {
            let tasks = tasks.iter().map(TaskDetails::new).collect();
            Json(ResponseData::new(RESPONSE_OK, "".to_owned(), Some(tasks)))
        }
        Err(error) => {
            error!("Error fetching task catalog: {:?}", error);
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Failed to fetch tasks".to_owned(),
                None,
            ))
        }
    }
}
