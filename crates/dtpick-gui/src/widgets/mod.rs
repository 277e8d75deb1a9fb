//! UI widgets for the picker demo host

pub mod config_form;
pub mod host_panel;
pub mod notification_log;
pub mod picker;
