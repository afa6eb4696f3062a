pub mod echo;
pub mod health;
pub mod number;

pub use echo::echo;
pub use health::health_summary;
pub use number::{
    DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES, NumberError, format_number, format_number_with,
};
