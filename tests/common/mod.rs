// Each test binary uses a different part of the helpers.
#[allow(dead_code)]
pub(crate) mod test_utils;
