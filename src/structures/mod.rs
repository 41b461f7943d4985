pub mod fft;
pub mod poly;
pub mod recurrence;
