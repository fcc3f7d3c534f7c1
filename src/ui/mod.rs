pub mod histogram;
pub mod panels;
pub mod plot;
