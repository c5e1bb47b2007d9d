//! Read soundings in the comma delimited text format distributed by the Storm Prediction Center.
//!
//! After a fixed number of header lines every line holds six comma separated numbers: pressure
//! (hPa), height (m), temperature (C), dew point (C), wind direction (degrees), and wind speed
//! (knots). Blank lines are ignored and a line starting with `%END%` ends the data.
//!
//! Values are not range checked here. Missing value sentinels such as `-9999.00` are kept as read,
//! range checks belong to the `validity` module and are applied downstream.
use crate::{
    error::{AnalysisError, Result},
    sounding::{DataRow, Sounding, StationInfo},
};
use chrono::{NaiveDate, NaiveDateTime};
use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};
use std::{path::Path, str::FromStr};
use tracing::debug;

/// Number of header lines in an SPC sounding file.
pub const DEFAULT_SKIP_ROWS: usize = 6;

const END_MARKER: &str = "%END%";
const FIELD_NAMES: [&str; 6] = [
    "pressure",
    "height",
    "temperature",
    "dew point",
    "wind direction",
    "wind speed",
];

/// Read an SPC sounding file, skipping `skip_rows` header lines.
///
/// If the file name looks like `FWD_20141014_00.txt` the station identifier and valid time are
/// filled in from it.
pub fn read_spc_file<P: AsRef<Path>>(path: P, skip_rows: usize) -> Result<Sounding> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;

    let mut snd = parse_spc(&text, skip_rows)?
        .with_source_description(format!("SPC sounding file {}", path.display()));

    if let Some((station, valid_time)) = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(parse_spc_file_stem)
    {
        snd = snd.with_station_info(station).with_valid_time(valid_time);
    }

    debug!(path = %path.display(), levels = snd.len(), "read sounding");

    Ok(snd)
}

/// Parse the text of an SPC sounding, skipping `skip_rows` header lines.
///
/// # Examples
///
/// ```rust
/// use metfor::{Celsius, HectoPascal};
/// use skewt_analysis::parse_spc;
///
/// let text = "header\n 1000.00, 110.00, 20.2, 15.1, 180.00, 10.00\n 925.00, 780.00, 18.0, 9.5, 200.00, 20.00\n";
/// let snd = parse_spc(text, 1).unwrap();
///
/// assert_eq!(snd.len(), 2);
/// assert_eq!(snd.pressure_profile()[1], HectoPascal(925.0));
/// assert_eq!(snd.dew_point_profile()[0], Celsius(15.1));
/// ```
pub fn parse_spc(text: &str, skip_rows: usize) -> Result<Sounding> {
    text.lines()
        .enumerate()
        .skip(skip_rows)
        .map(|(idx, line)| (idx + 1, line.trim()))
        .take_while(|(_, line)| !line.starts_with(END_MARKER))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_num, line)| parse_row(line_num, line))
        .collect()
}

fn parse_row(line_num: usize, line: &str) -> Result<DataRow> {
    let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
    if tokens.len() != FIELD_NAMES.len() {
        return Err(AnalysisError::Parse {
            line: line_num,
            message: format!("expected 6 fields, found {}", tokens.len()),
        });
    }

    let mut vals = [0.0f64; 6];
    for (val, (token, name)) in vals.iter_mut().zip(tokens.iter().zip(FIELD_NAMES.iter())) {
        *val = f64::from_str(token).map_err(|_| AnalysisError::Parse {
            line: line_num,
            message: format!("invalid {} value '{}'", name, token),
        })?;
    }

    let [p, z, t, dp, dir, spd] = vals;
    Ok(DataRow {
        pressure: HectoPascal(p),
        height: Meters(z),
        temperature: Celsius(t),
        dew_point: Celsius(dp),
        wind: WindSpdDir {
            speed: Knots(spd),
            direction: dir,
        },
    })
}

/// Get the station and valid time from a file stem like `FWD_20141014_00`.
pub fn parse_spc_file_stem(stem: &str) -> Option<(StationInfo, NaiveDateTime)> {
    let mut parts = stem.split('_');
    let station = parts.next()?;
    let date = parts.next()?;
    let hour = parts.next()?;

    if parts.next().is_some()
        || station.is_empty()
        || !station.chars().all(|c| c.is_ascii_alphanumeric())
        || date.len() != 8
        || !date.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let year = i32::from_str(&date[0..4]).ok()?;
    let month = u32::from_str(&date[4..6]).ok()?;
    let day = u32::from_str(&date[6..8]).ok()?;
    let hour = u32::from_str(hour).ok()?;

    let valid_time = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)?;

    Some((
        StationInfo::new().with_station(station.to_uppercase()),
        valid_time,
    ))
}
