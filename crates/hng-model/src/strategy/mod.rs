mod placement;
pub use placement::RetryPlacement;

mod throttle;
pub use throttle::ThrottleStrategy;
