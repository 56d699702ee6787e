mod netpbm;

pub use netpbm::{encode, encode_to_vec, NetpbmImageWriter};
