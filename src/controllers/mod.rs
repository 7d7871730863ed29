pub mod cron_controller;
pub mod flights_controller;
pub mod home_controller;
pub mod notifications_controller;
