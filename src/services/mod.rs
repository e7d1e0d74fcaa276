pub mod flag_store;
pub use flag_store::{FlagError, FlagStore, FlagWriter};

pub mod season_flags;
pub use season_flags::SeasonFlagMutator;

pub mod show_service;
pub mod show_service_impl;
pub use show_service::{ShowError, ShowService};
pub use show_service_impl::SeaOrmShowService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, SessionUser};
pub use auth_service_impl::SeaOrmAuthService;

pub mod settings_service;
pub mod settings_service_impl;
pub use settings_service::{SettingsError, SettingsService};
pub use settings_service_impl::SeaOrmSettingsService;
