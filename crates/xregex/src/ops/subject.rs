use crate::engine::{XRegexError, XResult};

/// Anything an operation accepts as its subject. Values are stringified the
/// way a script host would; an absent value (`None`) is a TypeError.
pub trait IntoSubject {
    fn into_subject(self) -> XResult<String>;
}

impl IntoSubject for &str {
    fn into_subject(self) -> XResult<String> {
        Ok(self.to_string())
    }
}

impl IntoSubject for String {
    fn into_subject(self) -> XResult<String> {
        Ok(self)
    }
}

impl IntoSubject for &String {
    fn into_subject(self) -> XResult<String> {
        Ok(self.clone())
    }
}

impl IntoSubject for char {
    fn into_subject(self) -> XResult<String> {
        Ok(self.to_string())
    }
}

impl IntoSubject for bool {
    fn into_subject(self) -> XResult<String> {
        Ok(if self { "true" } else { "false" }.to_string())
    }
}

macro_rules! integer_subject {
    ($($t:ty),*) => {
        $(
            impl IntoSubject for $t {
                fn into_subject(self) -> XResult<String> {
                    Ok(itoa::Buffer::new().format(self).to_string())
                }
            }
        )*
    };
}

integer_subject!(i32, i64, u32, u64, usize);

impl IntoSubject for f64 {
    fn into_subject(self) -> XResult<String> {
        Ok(number_to_string(self))
    }
}

impl<T: IntoSubject> IntoSubject for Option<T> {
    fn into_subject(self) -> XResult<String> {
        match self {
            Some(value) => value.into_subject(),
            None => Err(XRegexError::type_error("Cannot convert undefined or null to string")),
        }
    }
}

/// Number formatting as a script host prints it: `NaN`, `Infinity`,
/// integral values without a fraction, exponents past 1e21 and below 1e-6.
pub(crate) fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let abs = value.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }
    // past 2^53 the shortest round-trip digits differ from the exact integer
    if value.fract() == 0.0 && abs < 9007199254740992.0 {
        return itoa::Buffer::new().format(value as i64).to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(-1e20), "-100000000000000000000");
        assert_eq!(number_to_string(2f64.powi(63)), "9223372036854776000");
        assert_eq!(number_to_string(9007199254740991.0), "9007199254740991");
    }

    #[test]
    fn test_absent_subject_is_type_error() {
        let err = None::<&str>.into_subject().unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::Type);
        assert_eq!(Some(12u32).into_subject().unwrap(), "12");
        assert_eq!(true.into_subject().unwrap(), "true");
    }
}
