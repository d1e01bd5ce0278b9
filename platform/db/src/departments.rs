//! Department model layer.

use entity::department::{self, ActiveModel, Column, Entity as Department};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    DbResult, random_offset,
    validation::{ValidationErrors, require_non_empty, required_text},
};

/// Untrusted department input as it arrives in a request body.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DepartmentDraft {
    #[serde(default)]
    pub name: Option<Value>,
}

impl DepartmentDraft {
    pub fn validate(&self) -> Result<NewDepartment, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text("name", self.name.as_ref(), &mut errors);
        match name {
            Some(name) => errors.into_result(NewDepartment { name }),
            None => Err(errors),
        }
    }
}

/// Validated department fields, not yet stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDepartment {
    pub name: String,
}

impl NewDepartment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_non_empty("name", &self.name, &mut errors);
        errors.into_result(())
    }
}

#[instrument(skip_all)]
pub async fn insert<C: ConnectionTrait>(db: &C, fields: NewDepartment) -> DbResult<department::Model> {
    fields.validate()?;
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(fields.name),
    }
    .insert(db)
    .await?;
    tracing::debug!(id = %model.id, "department inserted");
    Ok(model)
}

pub async fn find_all<C: ConnectionTrait>(db: &C) -> DbResult<Vec<department::Model>> {
    Ok(Department::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> DbResult<Option<department::Model>> {
    Ok(Department::find_by_id(id).one(db).await?)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> DbResult<u64> {
    Ok(Department::find().count(db).await?)
}

/// One department picked uniformly at random. The count and the fetch are
/// separate queries, so a concurrent delete can make this return `None` for
/// a non-empty table.
pub async fn random<C: ConnectionTrait>(db: &C) -> DbResult<Option<department::Model>> {
    let Some(offset) = random_offset(count(db).await?) else {
        return Ok(None);
    };
    Ok(Department::find()
        .order_by_asc(Column::Id)
        .offset(offset)
        .one(db)
        .await?)
}

/// Replaces every mutable field of the department. Returns the number of rows
/// touched (0 when the id is unknown).
#[instrument(skip(db, fields))]
pub async fn replace<C: ConnectionTrait>(db: &C, id: Uuid, fields: NewDepartment) -> DbResult<u64> {
    fields.validate()?;
    let result = Department::update_many()
        .col_expr(Column::Name, Expr::value(fields.name))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

#[instrument(skip(db))]
pub async fn delete_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> DbResult<u64> {
    let result = Department::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}
