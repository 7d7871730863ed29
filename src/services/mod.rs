pub mod amadeus;
pub mod db_init;
pub mod poll_monitor;

pub mod flights_service;
pub mod price_poll;
