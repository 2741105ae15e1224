use super::error::RuntimeError;
use super::LoxValue;

pub trait ValueFormatter {
    fn format(&self, value: &LoxValue) -> String;
    fn format_error(&self, error: &RuntimeError) -> String;
}

/// Formats values the way `print` shows them.
pub struct BasicFormatter;

impl BasicFormatter {
    fn format_verbose(value: &LoxValue) -> String {
        match value {
            LoxValue::Number(v) => format!("Number({})", format_number(*v)),
            LoxValue::String(v) => format!("String(\"{v}\")"),
            LoxValue::Nil => "Nil".to_string(),
            LoxValue::Bool(v) => format!("Bool({v})"),
            LoxValue::NativeFunction(fun) => format!("NativeFunction({})", fun.get_name()),
            LoxValue::Function(fun) => format!("Function({})", fun.name()),
            LoxValue::Class(class) => format!("Class({})", class.name),
            LoxValue::Instance(instance) => format!("Instance({})", instance.class.name),
        }
    }
}

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &LoxValue) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let code = error.code();
        let category = error.category();
        match error {
            RuntimeError::NonNumeric { operand, .. } => {
                format!("[{code}] {category}: {error} Got {}.", Self::format_verbose(operand))
            }
            RuntimeError::NonNumerics { lhs, rhs, .. } | RuntimeError::NonAddable { lhs, rhs } => {
                format!(
                    "[{code}] {category}: {error} Got [{}, {}].",
                    Self::format_verbose(lhs),
                    Self::format_verbose(rhs)
                )
            }
            RuntimeError::InvalidCallee(callee) => format!(
                "[{code}] {category}: Can only call functions and classes, got {}.",
                Self::format_verbose(callee)
            ),
            _ => format!("[{code}] {category}: {error}"),
        }
    }
}

/// Like [`BasicFormatter`] but strings keep their quotes.
pub struct ReprFormatter;

impl ValueFormatter for ReprFormatter {
    fn format(&self, value: &LoxValue) -> String {
        match value {
            LoxValue::String(v) => format!("\"{v}\""),
            v => format!("{v}"),
        }
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        BasicFormatter.format_error(error)
    }
}

/// Renders a number with the shortest digits that round trip.
///
/// Integral values drop their fractional part. Magnitudes from 1e16 up, and
/// non-zero magnitudes below 1e-4, switch to scientific notation with a signed
/// exponent of at least two digits (`1e+16`, `2.5e-05`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        let scientific = format!("{value:e}");
        match scientific.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => scientific,
        }
    } else {
        format!("{value}")
    }
}
