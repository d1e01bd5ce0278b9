use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use platform_api::{ApiError, ApiResult, Message, deleted_ack, updated_ack};
use platform_db::employees::{self, EmployeeDraft, EmployeeFilter, PopulatedEmployee};
use tracing::{info, instrument};

use super::parse_id;
use crate::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/random", get(random))
        .route("/{id}", get(get_by_id).put(update_by_id).delete(delete_by_id))
}

#[instrument(name = "employees.list", skip_all)]
async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<PopulatedEmployee>>> {
    let all = employees::find_populated(&state.pool, &EmployeeFilter::all()).await?;
    Ok(Json(all))
}

#[instrument(name = "employees.random", skip_all)]
async fn random(State(state): State<AppState>) -> ApiResult<Json<PopulatedEmployee>> {
    let picked = employees::random(&state.pool)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(employees::populate(&state.pool, picked).await?))
}

#[instrument(name = "employees.get", skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PopulatedEmployee>> {
    let id = parse_id(&id).ok_or_else(ApiError::not_found)?;
    employees::find_by_id_populated(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

#[instrument(name = "employees.create", skip_all)]
async fn create(
    State(state): State<AppState>,
    Json(draft): Json<EmployeeDraft>,
) -> ApiResult<Json<Message>> {
    let fields = draft.validate()?;
    let created = employees::insert(&state.pool, fields).await?;
    info!(id = %created.id, "employee created");
    Ok(Json(Message::ok()))
}

#[instrument(name = "employees.update", skip(state, draft))]
async fn update_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<EmployeeDraft>,
) -> ApiResult<Json<Message>> {
    let id = parse_id(&id).ok_or_else(ApiError::not_found_for_write)?;
    if employees::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found_for_write());
    }
    let fields = draft.validate()?;
    employees::replace(&state.pool, id, fields).await?;
    let all = employees::find_populated(&state.pool, &EmployeeFilter::all()).await?;
    Ok(Json(updated_ack(&all)?))
}

#[instrument(name = "employees.delete", skip(state))]
async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let id = parse_id(&id).ok_or_else(ApiError::not_found_for_write)?;
    let Some(deleted) = employees::find_by_id_populated(&state.pool, id).await? else {
        return Err(ApiError::not_found_for_write());
    };
    employees::remove(&state.pool, deleted.employee.clone()).await?;
    info!(%id, "employee deleted");
    let remaining = employees::find_populated(&state.pool, &EmployeeFilter::all()).await?;
    Ok(Json(deleted_ack(&deleted, &remaining)?))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use entity::DepartmentRef;
    use platform_db::{
        departments::{self, NewDepartment},
        employees::{self, EmployeeFilter, NewEmployee},
    };
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::test_support::{body_json, json_request, test_app};

    #[tokio::test]
    async fn create_and_read_back_with_populated_department() {
        let (app, pool) = test_app().await;
        let dep = departments::insert(&pool, NewDepartment::new("Research"))
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/employees",
                json!({"firstName": "Ada", "lastName": "Lovelace", "department": dep.id}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"message": "OK"}));

        let stored = employees::find_one(&pool, &EmployeeFilter::all().first_name("Ada"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.department_ref(), Some(DepartmentRef::ById(dep.id)));

        let response = app
            .oneshot(
                Request::get(format!("/employees/{}", stored.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "id": stored.id,
                "firstName": "Ada",
                "lastName": "Lovelace",
                "department": {"id": dep.id, "name": "Research"},
            })
        );
    }

    #[tokio::test]
    async fn create_reports_each_bad_field() {
        let (app, pool) = test_app().await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/employees",
                json!({"firstName": [], "lastName": "Wilson", "department": {}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|err| err["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["firstName", "department"]);
        assert_eq!(employees::count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_keeps_orphans_and_free_text() {
        let (app, pool) = test_app().await;
        let orphan_ref = Uuid::new_v4();
        employees::insert(&pool, NewEmployee::new("Grace", "Hopper", orphan_ref))
            .await
            .unwrap();
        employees::insert(
            &pool,
            NewEmployee::new("Alan", "Turing", DepartmentRef::ByName("Codebreaking".into())),
        )
        .await
        .unwrap();

        let response = app
            .oneshot(Request::get("/employees").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        let department_of = |first: &str| {
            list.iter()
                .find(|emp| emp["firstName"] == first)
                .map(|emp| emp["department"].clone())
                .unwrap()
        };
        assert_eq!(department_of("Grace"), json!(orphan_ref));
        assert_eq!(department_of("Alan"), json!("Codebreaking"));
    }

    #[tokio::test]
    async fn update_and_delete_follow_department_contract() {
        let (app, pool) = test_app().await;
        let emp = employees::insert(
            &pool,
            NewEmployee::new("Jon", "Snow", DepartmentRef::ByName("Watch".into())),
        )
        .await
        .unwrap();
        let uri = format!("/employees/{}", emp.id);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &uri,
                json!({"firstName": "Jonathan", "lastName": "Wilson", "department": "Sales"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().starts_with("OK updated dataBase:"));
        let stored = employees::find_by_id(&pool, emp.id).await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Jonathan");
        assert_eq!(stored.department_name.as_deref(), Some("Sales"));

        let response = app
            .clone()
            .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().starts_with("OK deleted element"));

        for method in ["GET", "PUT", "DELETE"] {
            let response = app
                .clone()
                .oneshot(json_request(
                    method,
                    &uri,
                    json!({"firstName": "a", "lastName": "b", "department": "c"}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method}");
        }
    }

    #[tokio::test]
    async fn random_on_empty_collection_is_not_found() {
        let (app, _pool) = test_app().await;
        let response = app
            .oneshot(Request::get("/employees/random").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"message": "Not found"}));
    }
}
