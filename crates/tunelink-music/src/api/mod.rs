pub mod ytm2spotify;
