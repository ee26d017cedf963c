//! Output scripts, wallet address types, and worst-case spend sizing.

pub mod address_type;
pub mod sizes;
pub mod standard;

pub use address_type::{AddressType, SpendData, UnsupportedAddressType};
pub use sizes::{projected_weight, sig_script_witness_size, SpendSize};
