//! 推荐链接表
//!
//! `code` 唯一，查询时按大小写不敏感匹配。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReferralLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReferralLinks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralLinks::Code)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralLinks::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ReferralLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 只查 active 链接
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_referral_links_active")
                    .table(ReferralLinks::Table)
                    .col(ReferralLinks::Active)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_referral_links_active")
                    .table(ReferralLinks::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ReferralLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum ReferralLinks {
    #[sea_orm(iden = "referral_links")]
    Table,
    Id,
    Code,
    Active,
    CreatedAt,
}
