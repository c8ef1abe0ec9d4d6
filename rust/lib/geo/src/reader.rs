use std::net::IpAddr;
use std::path::Path;

use maxminddb::{Reader, geoip2};
use thiserror::Error;
use tracing::debug;

use worklens_core::Lang;

use crate::mapping::country_to_lang;

/// Failure to open the geolocation database. The server treats this
/// as a startup warning and continues with [`GeoDb::disabled`].
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("failed to open geolocation database: {0}")]
    Open(String),
}

/// Country-level IP geolocation backed by a MaxMind `.mmdb` file.
///
/// The reader is opened once at startup and shared read-only across
/// requests. Every per-request operation is total: lookup failures of
/// any kind (bad address, address not in the database, disabled
/// reader) degrade to the default language.
pub struct GeoDb {
    reader: Option<Reader<Vec<u8>>>,
}

impl GeoDb {
    /// Open the database file. Failure is reported to the caller so it
    /// can be logged as a startup diagnostic.
    pub fn open(path: &Path) -> Result<Self, GeoError> {
        let reader =
            Reader::open_readfile(path).map_err(|e| GeoError::Open(e.to_string()))?;
        Ok(Self { reader: Some(reader) })
    }

    /// A detector with no database: every detection yields the default
    /// language. Used when the database file is missing or unreadable.
    pub fn disabled() -> Self {
        Self { reader: None }
    }

    /// Whether a database is actually loaded.
    pub fn is_enabled(&self) -> bool {
        self.reader.is_some()
    }

    /// Look up the ISO country code for an address. Any library error
    /// becomes `None`.
    pub fn country_code(&self, ip: IpAddr) -> Option<String> {
        let reader = self.reader.as_ref()?;
        let country: geoip2::Country = match reader.lookup(ip) {
            Ok(c) => c,
            Err(e) => {
                debug!("geo lookup failed for {}: {}", ip, e);
                return None;
            }
        };
        country
            .country
            .and_then(|c| c.iso_code)
            .map(|s| s.to_string())
    }

    /// Detect the language for a textual IP address.
    ///
    /// Total: malformed addresses, lookup misses and a disabled reader
    /// all resolve to `Lang::En`.
    pub fn detect(&self, ip: &str) -> Lang {
        let addr: IpAddr = match ip.trim().parse() {
            Ok(a) => a,
            Err(_) => return Lang::default(),
        };
        self.detect_addr(addr)
    }

    /// Detect the language for an already-parsed address.
    pub fn detect_addr(&self, ip: IpAddr) -> Lang {
        match self.country_code(ip) {
            Some(code) => country_to_lang(&code),
            None => Lang::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_detector_defaults() {
        let geo = GeoDb::disabled();
        assert!(!geo.is_enabled());
        assert_eq!(geo.detect("8.8.8.8"), Lang::En);
        assert_eq!(geo.detect("2001:db8::1"), Lang::En);
        assert_eq!(geo.country_code("8.8.8.8".parse().unwrap()), None);
    }

    #[test]
    fn malformed_address_defaults() {
        let geo = GeoDb::disabled();
        assert_eq!(geo.detect("not-an-ip"), Lang::En);
        assert_eq!(geo.detect(""), Lang::En);
        assert_eq!(geo.detect("999.999.0.1"), Lang::En);
    }

    #[test]
    fn open_missing_file_errors() {
        let err = GeoDb::open(Path::new("/nonexistent/geo.mmdb"));
        assert!(err.is_err());
    }
}
