pub mod health;
pub mod method;
pub mod submit_form;
pub mod upload;
