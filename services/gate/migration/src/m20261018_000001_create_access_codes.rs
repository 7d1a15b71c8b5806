use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccessCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccessCodes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AccessCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccessCodes::CreatedByEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccessCodes::CreatedByAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AccessCodes::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves the stale sweep: unused codes ordered by age.
        manager
            .create_index(
                Index::create()
                    .table(AccessCodes::Table)
                    .col(AccessCodes::Used)
                    .col(AccessCodes::CreatedAt)
                    .name("idx_access_codes_used_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccessCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AccessCodes {
    Table,
    Id,
    CreatedAt,
    CreatedByEmail,
    CreatedByAdmin,
    Used,
}
