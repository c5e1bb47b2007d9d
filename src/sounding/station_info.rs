/// Station identification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StationInfo {
    /// Station identifier, eg FWD
    id: Option<String>,
}

impl StationInfo {
    /// Create a new object with default values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skewt_analysis::StationInfo;
    ///
    /// assert!(StationInfo::new().station_id().is_none());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a station identifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skewt_analysis::StationInfo;
    ///
    /// assert_eq!(StationInfo::new().with_station("FWD".to_owned()).station_id(), Some("FWD"));
    /// assert_eq!(StationInfo::new().with_station(Some("OUN".to_owned())).station_id(), Some("OUN"));
    /// assert!(StationInfo::new().with_station(None).station_id().is_none());
    /// ```
    #[inline]
    pub fn with_station<T>(mut self, id: T) -> Self
    where
        Option<String>: From<T>,
    {
        self.id = Option::from(id);
        self
    }

    /// Station identifier, eg FWD
    #[inline]
    pub fn station_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
