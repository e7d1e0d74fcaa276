use sea_orm::entity::prelude::*;

/// Sparse per-user flag record. A missing row means every flag is unset.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_episode_flags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub episode_id: i32,
    pub flag_1: Option<bool>,
    pub flag_2: Option<bool>,
    pub flag_3: Option<bool>,
    pub flag_4: Option<bool>,
    pub flag_5: Option<bool>,
    pub flag_6: Option<bool>,
    pub flag_7: Option<bool>,
    pub flag_8: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::episodes::Entity",
        from = "Column::EpisodeId",
        to = "super::episodes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Episodes,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episodes.def()
    }
}

impl Model {
    #[must_use]
    pub const fn flags(&self) -> crate::domain::FlagSet {
        crate::domain::FlagSet::from_slots([
            self.flag_1, self.flag_2, self.flag_3, self.flag_4, self.flag_5, self.flag_6,
            self.flag_7, self.flag_8,
        ])
    }
}

/// Column holding the given flag slot.
#[must_use]
pub const fn flag_column(key: crate::domain::FlagKey) -> Column {
    match key.index() {
        1 => Column::Flag1,
        2 => Column::Flag2,
        3 => Column::Flag3,
        4 => Column::Flag4,
        5 => Column::Flag5,
        6 => Column::Flag6,
        7 => Column::Flag7,
        _ => Column::Flag8,
    }
}

impl ActiveModelBehavior for ActiveModel {}
