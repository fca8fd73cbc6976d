pub mod registry;
pub mod traits;

// Source implementations
pub mod fred;
pub mod macrotrends;
pub mod yahoo_finance;
