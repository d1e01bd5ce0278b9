use std::fmt;

use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub first_name: String,
    pub last_name: String,
    /// Set when the employee points at a department record. Not a foreign key.
    #[sea_orm(indexed)]
    pub department_id: Option<Uuid>,
    /// Set when the department is free text.
    pub department_name: Option<String>,
}

impl Model {
    /// Rebuilds the tagged reference from the two storage columns.
    pub fn department_ref(&self) -> Option<DepartmentRef> {
        match (&self.department_id, &self.department_name) {
            (Some(id), _) => Some(DepartmentRef::ById(*id)),
            (None, Some(name)) => Some(DepartmentRef::ByName(name.clone())),
            (None, None) => None,
        }
    }

    pub fn set_department(&mut self, department: DepartmentRef) {
        match department {
            DepartmentRef::ById(id) => {
                self.department_id = Some(id);
                self.department_name = None;
            }
            DepartmentRef::ByName(name) => {
                self.department_id = None;
                self.department_name = Some(name);
            }
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn set_department(&mut self, department: DepartmentRef) {
        match department {
            DepartmentRef::ById(id) => {
                self.department_id = Set(Some(id));
                self.department_name = Set(None);
            }
            DepartmentRef::ByName(name) => {
                self.department_id = Set(None);
                self.department_name = Set(Some(name));
            }
        }
    }
}

/// What an employee's `department` field holds: a department identifier or
/// free text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepartmentRef {
    ById(Uuid),
    ByName(String),
}

impl DepartmentRef {
    /// Text that parses as an identifier becomes a reference, anything else is
    /// kept as a name.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        match Uuid::parse_str(&text) {
            Ok(id) => Self::ById(id),
            Err(_) => Self::ByName(text),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            Self::ById(id) => Some(*id),
            Self::ByName(_) => None,
        }
    }
}

impl From<Uuid> for DepartmentRef {
    fn from(value: Uuid) -> Self {
        Self::ById(value)
    }
}

impl From<&super::department::Model> for DepartmentRef {
    fn from(value: &super::department::Model) -> Self {
        Self::ById(value.id)
    }
}

impl fmt::Display for DepartmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "{id}"),
            Self::ByName(name) => f.write_str(name),
        }
    }
}
