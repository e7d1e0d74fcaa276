use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Random API key (64-char hex string)
    #[sea_orm(unique)]
    pub api_key: String,

    pub dark_theme: bool,

    /// Display labels for the eight episode flags. Empty hides the flag.
    #[sea_orm(default_value = "")]
    pub flag_1: String,
    #[sea_orm(default_value = "")]
    pub flag_2: String,
    #[sea_orm(default_value = "")]
    pub flag_3: String,
    #[sea_orm(default_value = "")]
    pub flag_4: String,
    #[sea_orm(default_value = "")]
    pub flag_5: String,
    #[sea_orm(default_value = "")]
    pub flag_6: String,
    #[sea_orm(default_value = "")]
    pub flag_7: String,
    #[sea_orm(default_value = "")]
    pub flag_8: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_episode_flags::Entity")]
    UserEpisodeFlags,
}

impl Related<super::user_episode_flags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserEpisodeFlags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
