pub mod booking;
pub mod customer;
pub mod payment;
pub mod ports;
pub mod receipt;
