pub mod day_statistics;
pub mod last_feeding;

pub use day_statistics::DayStatisticsView;
pub use last_feeding::LastFeedingModel;
