mod netpbm;

pub use netpbm::{decode, NetpbmImageReader};
