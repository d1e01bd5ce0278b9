//! Sample records for local runs.

use anyhow::Result;
use entity::DepartmentRef;
use platform_db::{
    DbPool,
    departments::{self, NewDepartment},
    employees::{self, NewEmployee},
};
use tracing::info;

const DEPARTMENTS: &[&str] = &["IT", "Marketing", "Testing"];
const EMPLOYEES: &[(&str, &str, &str)] = &[
    ("John", "Doe", "IT"),
    ("Amanda", "Doe", "Marketing"),
    ("Jonathan", "Wilson", "IT"),
    ("Mary", "Jane", "Testing"),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub departments: usize,
    pub employees: usize,
}

/// Inserts the sample set unless departments already exist.
pub async fn seed(pool: &DbPool) -> Result<SeedReport> {
    if departments::count(pool).await? > 0 {
        info!("departments present; skipping seed");
        return Ok(SeedReport::default());
    }

    let mut created = Vec::with_capacity(DEPARTMENTS.len());
    for name in DEPARTMENTS {
        created.push(departments::insert(pool, NewDepartment::new(*name)).await?);
    }

    let mut report = SeedReport {
        departments: created.len(),
        employees: 0,
    };
    for (first, last, department) in EMPLOYEES {
        let department = created
            .iter()
            .find(|record| record.name == *department)
            .map(DepartmentRef::from)
            .unwrap_or_else(|| DepartmentRef::ByName(department.to_string()));
        employees::insert(pool, NewEmployee::new(*first, *last, department)).await?;
        report.employees += 1;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use platform_db::employees::EmployeeFilter;

    use super::*;
    use crate::test_support::test_app;

    #[tokio::test]
    async fn seeds_once() {
        let (_app, pool) = test_app().await;
        let report = seed(&pool).await.unwrap();
        assert_eq!(report.departments, DEPARTMENTS.len());
        assert_eq!(report.employees, EMPLOYEES.len());

        assert_eq!(seed(&pool).await.unwrap(), SeedReport::default());
        assert_eq!(departments::count(&pool).await.unwrap(), DEPARTMENTS.len() as u64);

        let populated = employees::find_populated(&pool, &EmployeeFilter::all())
            .await
            .unwrap();
        assert!(populated.iter().all(|emp| emp.department.is_some()));
    }
}
