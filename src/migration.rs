//! Schema migrations, run by the binary at startup.

use sea_orm::DbErr;
use sea_orm_migration::prelude::*;

use crate::jobs::entity::{Column, Entity};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateJobsTable)]
    }
}

pub struct CreateJobsTable;

impl MigrationName for CreateJobsTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_jobs_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateJobsTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Entity)
            .if_not_exists()
            .col(ColumnDef::new(Column::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Column::Title).string_len(100).not_null())
            .col(ColumnDef::new(Column::Slug).string().not_null())
            .col(ColumnDef::new(Column::Description).text().not_null())
            .col(ColumnDef::new(Column::Email).string().null())
            .col(ColumnDef::new(Column::Address).string().not_null())
            .col(ColumnDef::new(Column::Company).string().not_null())
            .col(ColumnDef::new(Column::Industry).text().not_null())
            .col(ColumnDef::new(Column::JobType).text().not_null())
            .col(ColumnDef::new(Column::MinEducation).text().not_null())
            .col(ColumnDef::new(Column::Positions).integer().not_null().default(1))
            .col(ColumnDef::new(Column::Experience).text().not_null())
            .col(ColumnDef::new(Column::Salary).big_integer().not_null())
            .col(
                ColumnDef::new(Column::PostingDate)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Column::LastDate)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(ColumnDef::new(Column::Version).integer().not_null().default(0))
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_jobs_title")
                    .table(Entity)
                    .col(Column::Title)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entity).to_owned())
            .await
    }
}
