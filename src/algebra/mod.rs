pub mod zmod;
