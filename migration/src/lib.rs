pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_departments;
mod m20240101_000002_create_employees;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_departments::Migration),
            Box::new(m20240101_000002_create_employees::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectOptions, Database};

    #[tokio::test]
    async fn migrations_apply_and_roll_back_on_sqlite() {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();

        Migrator::up(&db, None).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
        let manager = SchemaManager::new(&db);
        assert!(manager.has_table("departments").await.unwrap());
        assert!(manager.has_table("employees").await.unwrap());

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("employees").await.unwrap());
    }
}
