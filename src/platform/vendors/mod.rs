//! Built-in platform definitions.

pub mod arista_eos;
pub mod cisco_ios;
pub mod juniper_junos;
pub mod linux;
