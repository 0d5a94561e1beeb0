pub mod inks;
