//! Observation epoch line parsing
use hifitime::Epoch;
use thiserror::Error;

/// Modern RINEX delimits each observation epoch with this marker
pub const EPOCH_MARKER: char = '>';

/// Epoch (datetime) parsing error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("not an epoch line")]
    MissingMarker,
    #[error("missing datetime field(s)")]
    MissingField,
    #[error("failed to parse {0} field")]
    FieldParsing(&'static str),
    #[error("failed to parse seconds")]
    SecondParsing,
    #[error("invalid datetime")]
    InvalidEpoch,
}

/// Returns true if this line opens a new observation epoch.
/// This only checks the marker, content may still be invalid.
pub fn is_new_epoch(line: &str) -> bool {
    line.starts_with(EPOCH_MARKER)
}

fn integer_field<T: std::str::FromStr>(
    field: Option<&str>,
    name: &'static str,
) -> Result<T, Error> {
    field
        .ok_or(Error::MissingField)?
        .parse::<T>()
        .map_err(|_| Error::FieldParsing(name))
}

/// Parses the UTC [Epoch] of an epoch line, like
/// "> 2026 01 21 14 00 00.0000000  0 12".
/// Fractional seconds are truncated, trailing fields (flag, number of vehicles..)
/// are ignored.
pub fn parse_epoch(line: &str) -> Result<Epoch, Error> {
    if !is_new_epoch(line) {
        return Err(Error::MissingMarker);
    }

    // first item is the marker itself
    let mut items = line.split_whitespace().skip(1);

    let y = integer_field::<i32>(items.next(), "year")?;
    let m = integer_field::<u8>(items.next(), "month")?;
    let d = integer_field::<u8>(items.next(), "day")?;
    let hh = integer_field::<u8>(items.next(), "hours")?;
    let mm = integer_field::<u8>(items.next(), "minutes")?;

    let secs = items
        .next()
        .ok_or(Error::MissingField)?
        .parse::<f64>()
        .map_err(|_| Error::SecondParsing)?;

    // truncated toward zero: ]-1, 0[ stands for second 0
    if !secs.is_finite() || secs <= -1.0 || secs >= 60.0 {
        return Err(Error::SecondParsing);
    }

    if !(1..=12).contains(&m) || d == 0 || hh > 23 || mm > 59 {
        return Err(Error::InvalidEpoch);
    }

    Epoch::maybe_from_gregorian_utc(y, m, d, hh, mm, secs.trunc() as u8, 0)
        .map_err(|_| Error::InvalidEpoch)
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn epoch_parsing() {
        let epoch = parse_epoch("> 2026 01 21 14 00 00.0000000").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc(2026, 1, 21, 14, 0, 0, 0));

        // modern files carry flag and number of vehicles
        let epoch = parse_epoch("> 2022 01 09 00 00 30.0000000  0 12").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc(2022, 1, 9, 0, 0, 30, 0));

        // subseconds are truncated
        let epoch = parse_epoch("> 2026 01 21 14 00 59.9990000").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc(2026, 1, 21, 14, 0, 59, 0));

        let epoch = parse_epoch("> 2026 01 21 14 00 -0.5000000").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc(2026, 1, 21, 14, 0, 0, 0));
    }
    #[test]
    fn epoch_parsing_failures() {
        for (line, err) in [
            ("  2026 01 21 14 00 00.0000000", Error::MissingMarker),
            ("G01  22513484.772 7", Error::MissingMarker),
            ("> 2026 01 21 14 00", Error::MissingField),
            (">", Error::MissingField),
            ("> 2026 xx 21 14 00 00.0000000", Error::FieldParsing("month")),
            ("> 2026 01 21 14 00 abc", Error::SecondParsing),
            ("> 2026 01 21 14 00 NaN", Error::SecondParsing),
            ("> 2026 01 21 14 00 -1.0000000", Error::SecondParsing),
            ("> 2026 01 21 14 00 60.0000000", Error::SecondParsing),
            ("> 2026 13 21 14 00 00.0000000", Error::InvalidEpoch),
            ("> 2026 02 30 14 00 00.0000000", Error::InvalidEpoch),
            ("> 2026 01 21 24 00 00.0000000", Error::InvalidEpoch),
        ] {
            assert_eq!(parse_epoch(line), Err(err), "\"{}\"", line);
        }
    }
}
