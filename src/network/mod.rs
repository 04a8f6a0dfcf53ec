pub mod feed_forward;
pub mod recurrent;
