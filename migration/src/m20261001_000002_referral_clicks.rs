//! 推荐点击日志表
//!
//! 只追加写入；删除推荐链接时级联删除对应点击。

use sea_orm_migration::prelude::*;

use crate::m20261001_000001_referral_links::ReferralLinks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReferralClicks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReferralClicks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralClicks::ReferralId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReferralClicks::Code)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReferralClicks::Ip).text().not_null())
                    .col(
                        ColumnDef::new(ReferralClicks::UserAgent)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReferralClicks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referral_clicks_referral_id")
                            .from(ReferralClicks::Table, ReferralClicks::ReferralId)
                            .to(ReferralLinks::Table, ReferralLinks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_referral_clicks_referral_id")
                    .table(ReferralClicks::Table)
                    .col(ReferralClicks::ReferralId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_referral_clicks_created_at")
                    .table(ReferralClicks::Table)
                    .col(ReferralClicks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_referral_clicks_created_at")
                    .table(ReferralClicks::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_referral_clicks_referral_id")
                    .table(ReferralClicks::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ReferralClicks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ReferralClicks {
    #[sea_orm(iden = "referral_clicks")]
    Table,
    Id,
    ReferralId,
    Code,
    Ip,
    UserAgent,
    CreatedAt,
}
