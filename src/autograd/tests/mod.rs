//! Gradient checks for autograd operations

mod test_utils;
