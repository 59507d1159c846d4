pub mod poller;
pub mod vector2d;
