// Wire formats and the line-delimited JSON server.

pub mod dto;
pub mod server;
