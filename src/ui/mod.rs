pub mod decoration;
