use std::path::PathBuf;

use skewt_analysis::{read_spc_file, Sounding, DEFAULT_SKIP_ROWS};

pub mod diagram_tests;
pub mod reader_tests;

#[allow(unused_macros)] // False alarm
macro_rules! test_file {
    ($test_mod_name:ident, $fname:expr) => {
        mod $test_mod_name {

            use skewt_analysis::Sounding;
            use crate::utils;

            fn load_data() -> Sounding {
                utils::load_test_file($fname)
            }

            mod reader {
                use crate::utils::reader_tests;
                use super::load_data;

                #[test]
                fn levels_in_file_order() {
                    let snd = load_data();
                    reader_tests::test_levels_in_file_order(&snd);
                }

                #[test]
                fn station_and_valid_time() {
                    let snd = load_data();
                    reader_tests::test_station_and_valid_time(&snd, $fname);
                }
            }

            mod diagram {
                use crate::utils::diagram_tests;
                use super::load_data;

                #[test]
                fn masked_curves() {
                    let snd = load_data();
                    diagram_tests::test_masked_curves(&snd);
                }

                #[test]
                fn readout_matches_observations() {
                    let snd = load_data();
                    diagram_tests::test_readout_matches_observations(&snd);
                }

                #[test]
                fn svg_document() {
                    let snd = load_data();
                    diagram_tests::test_svg_document(&snd);
                }
            }
        }
    };
}

pub fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data")
}

pub fn load_test_file(fname: &str) -> Sounding {
    let path = test_data_dir().join(fname);
    read_spc_file(&path, DEFAULT_SKIP_ROWS)
        .unwrap_or_else(|err| panic!("Error loading {:?}: {}", path, err))
}

#[allow(dead_code)] // False alarm
pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    use std::f64;

    assert!(tol > 0.0);

    f64::abs(tgt - guess) <= tol
}
