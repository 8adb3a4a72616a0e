pub mod ipv4;
pub mod mac;
