pub mod app_state;
pub mod history_list;
