pub mod app;
pub mod timing;
pub mod debugging;
