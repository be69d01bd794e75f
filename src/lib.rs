pub mod dataset;
pub mod logging;
pub mod rpc;
pub mod shared;

pub use dataset::{DataSetError, DataSetOptions, RpcDataSet};


#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
pub mod test_helpers;
