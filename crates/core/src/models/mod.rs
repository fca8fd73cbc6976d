pub mod chart;
pub mod event;
pub mod price;
pub mod settings;
