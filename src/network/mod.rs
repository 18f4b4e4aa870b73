pub mod addr;

pub use addr::{AddrError, parse_host_port, split_host_port};

/// Public resolvers handed to the sandbox when simulation is off.
pub const PUBLIC_DNS_SERVERS: [&str; 2] = ["8.8.8.8", "8.8.4.4"];
