mod dashboard;
mod image_gen;
mod login;
mod not_found;
mod register;
mod search;

pub use dashboard::DashboardPage;
pub use image_gen::ImageGenPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use register::RegisterPage;
pub use search::SearchPage;
