//! Terminal presentation of the conversion form

pub mod convert;
pub mod interactive;
pub mod lists;
pub mod render;
pub mod setup;
pub mod ui;
