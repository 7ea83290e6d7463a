/// Classification of the numeric argument taken by `calc` and `mnrew`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericArg {
    Absent,
    Infinity,
    NotANumber,
    Zero,
    Negative,
    Value(f64),
}

const INFINITY_WORDS: [&str; 3] = ["infinity", "infinite", "inf"];

/// Validate the first command argument; the first matching rule wins
///
/// Order: absent, infinity words, unparseable, zero, negative, value.
/// The infinity words are checked before parsing because `f64` accepts
/// `inf` and `infinity` itself. `nan` counts as unparseable and any other
/// non-finite positive input (`1e999`) as infinity.
pub fn parse_numeric_arg(arg: Option<&str>) -> NumericArg {
    let Some(raw) = arg else {
        return NumericArg::Absent;
    };
    let raw = raw.trim();

    if INFINITY_WORDS.iter().any(|w| raw.eq_ignore_ascii_case(w)) {
        return NumericArg::Infinity;
    }

    let value = match raw.parse::<f64>() {
        Ok(v) if !v.is_nan() => v,
        _ => return NumericArg::NotANumber,
    };

    if value == 0.0 {
        NumericArg::Zero
    } else if value < 0.0 {
        NumericArg::Negative
    } else if value.is_infinite() {
        NumericArg::Infinity
    } else {
        NumericArg::Value(value)
    }
}
