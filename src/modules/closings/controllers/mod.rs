pub mod closing_controller;

pub use closing_controller::configure;
