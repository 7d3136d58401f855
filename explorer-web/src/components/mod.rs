pub(crate) mod loading;
pub(crate) mod nav_item;
pub(crate) mod preview_modal;
