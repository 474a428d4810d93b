// Command modules for the ayin CLI

pub mod keys;
pub mod pool;
pub mod staking;
pub mod utils;
