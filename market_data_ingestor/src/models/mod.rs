pub mod bar;
pub mod news;
pub mod zone;
