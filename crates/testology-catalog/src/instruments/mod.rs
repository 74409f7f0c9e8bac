pub mod gad7;
pub mod neo_ffi;
pub mod phq9;
pub mod pss10;
