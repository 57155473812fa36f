pub mod dispatch;
pub mod generate;
pub mod projects;
pub mod reports;
pub mod scripts;
pub mod serve;
pub mod show;
pub mod theme;
