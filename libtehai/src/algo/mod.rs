pub mod agari;
pub mod mentsu;
pub mod shanten;
pub mod wait;
