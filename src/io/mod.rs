pub mod per;
