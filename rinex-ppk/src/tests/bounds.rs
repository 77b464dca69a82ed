#[cfg(test)]
mod test {
    use crate::prelude::*;
    use crate::tests::toolkit::{init_logger, test_resource};
    #[test]
    fn rover_bounds() {
        init_logger();
        let bounds = ObservationBounds::from_path(test_resource("ROVER_20260121.obs")).unwrap();
        assert!(bounds.is_complete());
        assert_eq!(
            bounds.start,
            Some(Epoch::from_gregorian_utc(2026, 1, 21, 14, 0, 0, 0))
        );
        // fractional seconds are truncated
        assert_eq!(
            bounds.end,
            Some(Epoch::from_gregorian_utc(2026, 1, 21, 15, 30, 0, 0))
        );
        // corrupted epoch line is skipped
        assert_eq!(bounds.epochs, 7);
        assert_eq!(bounds.duration(), Some(90.0 * Unit::Minute));
    }
    #[test]
    fn base_bounds() {
        let bounds = ObservationBounds::from_path(test_resource("BASE_20260121.obs")).unwrap();
        assert_eq!(
            bounds.span(),
            Some((
                Epoch::from_gregorian_utc(2026, 1, 21, 13, 45, 0, 0),
                Epoch::from_gregorian_utc(2026, 1, 21, 16, 0, 0, 0),
            ))
        );
        assert_eq!(bounds.epochs, 10);
    }
    #[test]
    fn single_epoch() {
        let bounds = ObservationBounds::from_path(test_resource("SINGLE_EPOCH.obs")).unwrap();
        assert!(bounds.is_complete());
        assert_eq!(bounds.start, bounds.end);
        assert_eq!(bounds.epochs, 1);
        assert_eq!(bounds.duration(), Some(Duration::ZERO));
    }
    #[test]
    fn no_epochs() {
        for fp in ["NO_EPOCH.obs", "INVALID_EPOCHS.obs"] {
            let bounds = ObservationBounds::from_path(test_resource(fp)).unwrap();
            assert!(bounds.start.is_none(), "{}", fp);
            assert!(bounds.end.is_none(), "{}", fp);
            assert!(!bounds.is_complete(), "{}", fp);
            assert_eq!(bounds.epochs, 0, "{}", fp);
            assert_eq!(bounds.to_string(), "undetermined");
        }
    }
    #[test]
    fn from_reader() {
        let content = "     3.04           OBSERVATION DATA    M                   RINEX VERSION / TYPE
                                                            END OF HEADER
> 2026 01 21 14 00 00.0000000  0  1
G01  22513484.772 7
> not an epoch
> 2026 01 21 14 00 30.5000000  0  1
G01  22513484.772 7
";
        let bounds = ObservationBounds::from_reader(content.as_bytes()).unwrap();
        assert_eq!(bounds.epochs, 2);
        assert_eq!(bounds.duration(), Some(30.0 * Unit::Second));
    }
    #[test]
    fn missing_file() {
        let err = ObservationBounds::from_path(test_resource("DOES_NOT_EXIST.obs")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
    #[test]
    #[cfg(feature = "flate2")]
    fn gzip_bounds() {
        let plain = ObservationBounds::from_path(test_resource("ROVER_20260121.obs")).unwrap();
        let gzip = ObservationBounds::from_path(test_resource("ROVER_20260121.obs.gz")).unwrap();
        assert_eq!(plain, gzip);
    }
    #[test]
    #[cfg(not(feature = "flate2"))]
    fn gzip_requires_feature() {
        let err = ObservationBounds::from_path(test_resource("ROVER_20260121.obs.gz")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Unsupported);
    }
}
