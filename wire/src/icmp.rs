pub mod v6;
