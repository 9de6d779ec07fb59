//! Literal markup templates.
//!
//! Segments are concatenated with the string form of each interpolated
//! value. Nothing is escaped: interpolating untrusted input yields untrusted
//! markup.

use crate::value::Value;

/// Join `strings` with `values` interleaved: `strings[0] + values[0] +
/// strings[1] + ...`. Missing values and `Null` render as empty strings.
pub fn html(strings: &[&str], values: &[Value]) -> String {
    let mut markup = String::new();
    for (index, segment) in strings.iter().enumerate() {
        markup.push_str(segment);
        if let Some(value) = values.get(index) {
            markup.push_str(&interpolate(value));
        }
    }
    markup
}

/// String form of an interpolated value.
pub fn interpolate(value: &Value) -> String {
    value.to_string()
}

/// Build markup from string literals and `{expr}` interpolations, in any
/// order. Each expression is converted with `Value::from`.
///
/// ```
/// use tatl::html;
///
/// let name = "Ada";
/// let count = 3;
/// assert_eq!(html!("<p>" {name} " has " {count} "</p>"), "<p>Ada has 3</p>");
/// ```
#[macro_export]
macro_rules! html {
    ($($part:tt)*) => {{
        let mut markup = ::std::string::String::new();
        $( $crate::__html_part!(markup, $part); )*
        markup
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __html_part {
    ($markup:ident, { $value:expr }) => {
        $markup.push_str(&$crate::template::interpolate(&$crate::Value::from($value)));
    };
    ($markup:ident, $segment:literal) => {
        $markup.push_str($segment);
    };
}
