#[macro_use]
mod utils;

test_file!(fwd_20141014_00, "FWD_20141014_00.txt");
