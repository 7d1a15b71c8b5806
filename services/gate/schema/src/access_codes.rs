use sea_orm::entity::prelude::*;

/// Single-use access code shared by an admin as `/?code=<id>`.
/// `used` is a latch: set once on redemption, never cleared.
/// Unused rows are deleted once their TTL has elapsed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "access_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub created_by_email: String,
    pub created_by_admin: bool,
    pub used: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
