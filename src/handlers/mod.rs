pub mod display;
pub mod kyc;
pub mod presale;
