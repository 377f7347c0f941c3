use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_categories::Category;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Question::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Question::Question).text().not_null())
                    .col(ColumnDef::new(Question::Answer).text().not_null())
                    .col(ColumnDef::new(Question::CategoryId).integer().null())
                    .col(ColumnDef::new(Question::Difficulty).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_category_id")
                            .from(Question::Table, Question::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_category_id")
                    .table(Question::Table)
                    .col(Question::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Question {
    Table,
    Id,
    Question,
    Answer,
    CategoryId,
    Difficulty,
}
