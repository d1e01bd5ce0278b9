//! Employee model layer.
//!
//! Unsaved records are [`NewEmployee`] values; persisted ones are
//! [`employee::Model`]s carrying their generated id. Every write validates
//! first. The department reference is stored as-is and only resolved on read
//! ([`populate`]); nothing checks that a referenced department exists.

use entity::{
    DepartmentRef,
    department::{self, Entity as Department},
    employee::{self, ActiveModel, Column, Entity as Employee},
};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, UpdateMany, sea_query::Expr,
};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    DbResult, random_offset,
    validation::{FieldError, ValidationErrors, require_non_empty, required_text},
};

/// Untrusted employee input as it arrives in a request body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    #[serde(default)]
    pub first_name: Option<Value>,
    #[serde(default)]
    pub last_name: Option<Value>,
    #[serde(default)]
    pub department: Option<Value>,
}

impl EmployeeDraft {
    pub fn validate(&self) -> Result<NewEmployee, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let first_name = required_text("firstName", self.first_name.as_ref(), &mut errors);
        let last_name = required_text("lastName", self.last_name.as_ref(), &mut errors);
        let department = required_text("department", self.department.as_ref(), &mut errors)
            .map(DepartmentRef::from_text);
        match (first_name, last_name, department) {
            (Some(first_name), Some(last_name), Some(department)) => {
                errors.into_result(NewEmployee {
                    first_name,
                    last_name,
                    department,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Validated employee fields, not yet stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub department: DepartmentRef,
}

impl NewEmployee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<DepartmentRef>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_non_empty("firstName", &self.first_name, &mut errors);
        require_non_empty("lastName", &self.last_name, &mut errors);
        validate_department(&self.department, &mut errors);
        errors.into_result(())
    }
}

fn validate_department(department: &DepartmentRef, errors: &mut ValidationErrors) {
    if let DepartmentRef::ByName(name) = department {
        if name.is_empty() {
            errors.push(FieldError::required("department"));
        }
    }
}

/// Equality filter over employee fields. Unset fields match anything, so the
/// default filter selects every record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<DepartmentRef>,
}

impl EmployeeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn department(mut self, value: impl Into<DepartmentRef>) -> Self {
        self.department = Some(value.into());
        self
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(id) = self.id {
            condition = condition.add(Column::Id.eq(id));
        }
        if let Some(first_name) = &self.first_name {
            condition = condition.add(Column::FirstName.eq(first_name.as_str()));
        }
        if let Some(last_name) = &self.last_name {
            condition = condition.add(Column::LastName.eq(last_name.as_str()));
        }
        match &self.department {
            Some(DepartmentRef::ById(id)) => condition = condition.add(Column::DepartmentId.eq(*id)),
            Some(DepartmentRef::ByName(name)) => {
                condition = condition.add(Column::DepartmentName.eq(name.as_str()))
            }
            None => {}
        }
        condition
    }
}

/// Field-level `set`: only the populated fields are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<DepartmentRef>,
}

impl EmployeePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn department(mut self, value: impl Into<DepartmentRef>) -> Self {
        self.department = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.department.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(first_name) = &self.first_name {
            require_non_empty("firstName", first_name, &mut errors);
        }
        if let Some(last_name) = &self.last_name {
            require_non_empty("lastName", last_name, &mut errors);
        }
        if let Some(department) = &self.department {
            validate_department(department, &mut errors);
        }
        errors.into_result(())
    }

    fn apply(&self, mut update: UpdateMany<Employee>) -> UpdateMany<Employee> {
        if let Some(first_name) = &self.first_name {
            update = update.col_expr(Column::FirstName, Expr::value(first_name.clone()));
        }
        if let Some(last_name) = &self.last_name {
            update = update.col_expr(Column::LastName, Expr::value(last_name.clone()));
        }
        match &self.department {
            Some(DepartmentRef::ById(id)) => {
                update = update
                    .col_expr(Column::DepartmentId, Expr::value(Some(*id)))
                    .col_expr(Column::DepartmentName, Expr::value(None::<String>));
            }
            Some(DepartmentRef::ByName(name)) => {
                update = update
                    .col_expr(Column::DepartmentId, Expr::value(None::<Uuid>))
                    .col_expr(Column::DepartmentName, Expr::value(Some(name.clone())));
            }
            None => {}
        }
        update
    }
}

impl From<NewEmployee> for EmployeePatch {
    fn from(value: NewEmployee) -> Self {
        Self {
            first_name: Some(value.first_name),
            last_name: Some(value.last_name),
            department: Some(value.department),
        }
    }
}

/// An employee with its department resolved for reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulatedEmployee {
    pub employee: employee::Model,
    /// `None` for free-text departments and for references to records that no
    /// longer exist.
    pub department: Option<department::Model>,
}

impl PopulatedEmployee {
    pub fn is_orphan(&self) -> bool {
        self.employee.department_id.is_some() && self.department.is_none()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeView<'a> {
    id: Uuid,
    first_name: &'a str,
    last_name: &'a str,
    department: DepartmentView<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum DepartmentView<'a> {
    Record(&'a department::Model),
    Unresolved(Option<DepartmentRef>),
}

impl Serialize for PopulatedEmployee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let department = match &self.department {
            Some(record) => DepartmentView::Record(record),
            None => DepartmentView::Unresolved(self.employee.department_ref()),
        };
        EmployeeView {
            id: self.employee.id,
            first_name: &self.employee.first_name,
            last_name: &self.employee.last_name,
            department,
        }
        .serialize(serializer)
    }
}

#[instrument(skip_all)]
pub async fn insert<C: ConnectionTrait>(db: &C, fields: NewEmployee) -> DbResult<employee::Model> {
    fields.validate()?;
    let mut model = ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(fields.first_name),
        last_name: Set(fields.last_name),
        ..Default::default()
    };
    model.set_department(fields.department);
    let model = model.insert(db).await?;
    tracing::debug!(id = %model.id, "employee inserted");
    Ok(model)
}

pub async fn find<C: ConnectionTrait>(
    db: &C,
    filter: &EmployeeFilter,
) -> DbResult<Vec<employee::Model>> {
    Ok(Employee::find()
        .filter(filter.condition())
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

pub async fn find_one<C: ConnectionTrait>(
    db: &C,
    filter: &EmployeeFilter,
) -> DbResult<Option<employee::Model>> {
    Ok(Employee::find()
        .filter(filter.condition())
        .order_by_asc(Column::Id)
        .one(db)
        .await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> DbResult<Option<employee::Model>> {
    Ok(Employee::find_by_id(id).one(db).await?)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> DbResult<u64> {
    Ok(Employee::find().count(db).await?)
}

/// Same count-then-fetch race as the department variant.
pub async fn random<C: ConnectionTrait>(db: &C) -> DbResult<Option<employee::Model>> {
    let Some(offset) = random_offset(count(db).await?) else {
        return Ok(None);
    };
    Ok(Employee::find()
        .order_by_asc(Column::Id)
        .offset(offset)
        .one(db)
        .await?)
}

/// Applies `patch` to the first match (in id order). Returns rows touched.
#[instrument(skip_all)]
pub async fn update_one<C: ConnectionTrait>(
    db: &C,
    filter: &EmployeeFilter,
    patch: &EmployeePatch,
) -> DbResult<u64> {
    patch.validate()?;
    let Some(target) = find_one(db, filter).await? else {
        return Ok(0);
    };
    update_many(db, &EmployeeFilter::by_id(target.id), patch).await
}

/// Applies `patch` to every match. Returns rows touched.
#[instrument(skip_all)]
pub async fn update_many<C: ConnectionTrait>(
    db: &C,
    filter: &EmployeeFilter,
    patch: &EmployeePatch,
) -> DbResult<u64> {
    patch.validate()?;
    if patch.is_empty() {
        return Ok(0);
    }
    let result = patch
        .apply(Employee::update_many())
        .filter(filter.condition())
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Full-field replace of one employee. Returns rows touched.
pub async fn replace<C: ConnectionTrait>(db: &C, id: Uuid, fields: NewEmployee) -> DbResult<u64> {
    fields.validate()?;
    update_many(db, &EmployeeFilter::by_id(id), &EmployeePatch::from(fields)).await
}

/// Writes back a loaded record after local edits.
#[instrument(skip_all, fields(id = %model.id))]
pub async fn save<C: ConnectionTrait>(db: &C, model: &employee::Model) -> DbResult<employee::Model> {
    let Some(department) = model.department_ref() else {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required("department"));
        return Err(errors.into());
    };
    NewEmployee {
        first_name: model.first_name.clone(),
        last_name: model.last_name.clone(),
        department: department.clone(),
    }
    .validate()?;
    let mut active = ActiveModel {
        id: Unchanged(model.id),
        first_name: Set(model.first_name.clone()),
        last_name: Set(model.last_name.clone()),
        ..Default::default()
    };
    active.set_department(department);
    Ok(active.update(db).await?)
}

#[instrument(skip_all)]
pub async fn delete_one<C: ConnectionTrait>(db: &C, filter: &EmployeeFilter) -> DbResult<u64> {
    let Some(target) = find_one(db, filter).await? else {
        return Ok(0);
    };
    remove(db, target).await
}

#[instrument(skip_all)]
pub async fn delete_many<C: ConnectionTrait>(db: &C, filter: &EmployeeFilter) -> DbResult<u64> {
    let result = Employee::delete_many()
        .filter(filter.condition())
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Deletes the given record.
pub async fn remove<C: ConnectionTrait>(db: &C, model: employee::Model) -> DbResult<u64> {
    let result = model.delete(db).await?;
    Ok(result.rows_affected)
}

/// Resolves the department reference without touching what is stored.
pub async fn populate<C: ConnectionTrait>(
    db: &C,
    employee: employee::Model,
) -> DbResult<PopulatedEmployee> {
    let department = match employee.department_id {
        Some(_) => employee.find_related(Department).one(db).await?,
        None => None,
    };
    Ok(PopulatedEmployee {
        employee,
        department,
    })
}

pub async fn find_populated<C: ConnectionTrait>(
    db: &C,
    filter: &EmployeeFilter,
) -> DbResult<Vec<PopulatedEmployee>> {
    let rows = Employee::find()
        .filter(filter.condition())
        .order_by_asc(Column::Id)
        .find_also_related(Department)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(employee, department)| PopulatedEmployee {
            employee,
            department,
        })
        .collect())
}

pub async fn find_by_id_populated<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> DbResult<Option<PopulatedEmployee>> {
    Ok(find_populated(db, &EmployeeFilter::by_id(id))
        .await?
        .into_iter()
        .next())
}
