pub mod import;
pub mod rates;
pub mod setup;
pub mod ui;
