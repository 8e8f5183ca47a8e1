pub mod feeding_repository;
pub mod settings_repository;

pub use feeding_repository::FeedingRepository;
pub use settings_repository::SettingsRepository;
