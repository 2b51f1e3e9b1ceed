pub mod config_form;
pub mod detail_panel;
pub mod loading;
pub mod plan_sidebar;
pub mod progress_bar;
pub mod saved_list;
pub mod timeline;
