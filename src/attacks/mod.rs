pub mod cbc;
pub mod ctr;
pub mod dsa;
pub mod ecb;
pub mod mac;
pub mod prng;
pub mod rsa;
