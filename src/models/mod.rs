pub mod admin_data;
pub mod affiliate;
pub mod dashboard;
pub mod lenient;
