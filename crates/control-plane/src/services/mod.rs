// Services layer for business logic
// Services own validation and outcome mapping, calling storage directly

pub mod error;
pub mod event;
pub mod validation;

pub use error::ServiceError;
pub use event::EventService;
