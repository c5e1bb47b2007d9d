use chrono::NaiveDate;
use metfor::{Celsius, HectoPascal, Knots, Meters};
use skewt_analysis::Sounding;

pub fn test_levels_in_file_order(snd: &Sounding) {
    assert_eq!(snd.len(), 22);

    let pressure = snd.pressure_profile();
    assert_eq!(pressure[0], HectoPascal(1000.0));
    assert_eq!(pressure[1], HectoPascal(993.0));
    assert_eq!(pressure[21], HectoPascal(100.0));
    assert!(pressure.windows(2).all(|w| w[1] < w[0]));

    let height = snd.height_profile();
    assert_eq!(height[1], Meters(171.0));
    assert!(height.windows(2).all(|w| w[1] > w[0]));

    // Sentinels are kept as read
    assert_eq!(snd.temperature_profile()[0], Celsius(-9999.0));
    assert_eq!(snd.dew_point_profile()[19], Celsius(-9999.0));

    let row = snd.data_row(6).unwrap();
    assert_eq!(row.pressure, HectoPascal(850.0));
    assert_eq!(row.temperature, Celsius(14.6));
    assert_eq!(row.dew_point, Celsius(9.6));
    assert_eq!(row.wind.direction, 235.0);
    assert_eq!(row.wind.speed, Knots(25.0));
}

pub fn test_station_and_valid_time(snd: &Sounding, fname: &str) {
    assert_eq!(snd.station_info().station_id(), Some("FWD"));
    assert_eq!(
        snd.valid_time(),
        NaiveDate::from_ymd_opt(2014, 10, 14).and_then(|d| d.and_hms_opt(0, 0, 0))
    );
    assert!(snd.source_description().unwrap().contains(fname));
}
