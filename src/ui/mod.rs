pub mod add_form;
pub mod board;
pub mod charts;
pub mod components;
pub mod schedule;
pub mod status_form;
