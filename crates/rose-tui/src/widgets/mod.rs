pub mod display_indicator;
pub mod reading;
