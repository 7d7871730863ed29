pub mod flight;
pub mod notification;
pub mod price_observation;

pub use flight::TrackedFlight;
pub use notification::PriceChangeNotification;
pub use price_observation::PriceObservation;
