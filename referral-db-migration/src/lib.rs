pub use sea_orm_migration::prelude::*;

mod m20240115_000001_create_table;
mod m20240115_000002_create_table;
mod m20240115_000003_create_table;
mod m20240115_000004_create_table;
mod m20240115_000005_create_table;
mod m20240115_000006_create_index;
mod m20240115_000007_seed_tasks;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240115_000001_create_table::Migration),
            Box::new(m20240115_000002_create_table::Migration),
            Box::new(m20240115_000003_create_table::Migration),
            Box::new(m20240115_000004_create_table::Migration),
            Box::new(m20240115_000005_create_table::Migration),
            Box::new(m20240115_000006_create_index::Migration),
            Box::new(m20240115_000007_seed_tasks::Migration),
        ]
    }
}
