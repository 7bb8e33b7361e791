pub mod alerts;
pub mod assignment;
pub mod book;
pub mod dispatch;
pub mod init;
pub mod project;
pub mod schema;
pub mod shared;
pub mod status;
