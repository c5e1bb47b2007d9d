use skewt_analysis::{read_spc_file, Sounding, DEFAULT_SKIP_ROWS};
use std::path::PathBuf;

#[allow(dead_code)] // False alarm
pub fn load_test_file(fname: &str) -> Sounding {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);

    read_spc_file(&test_path, DEFAULT_SKIP_ROWS)
        .unwrap_or_else(|err| panic!("Error loading {:#?}: {}", test_path, err))
}
