use std::fmt;

/// CORS configuration error
///
/// Returned while building global defaults, extracting route declarations,
/// or resolving effective policies. All variants are startup-time failures;
/// nothing on the request path produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfigError {
    /// A configuration property could not be read as the expected type
    InvalidProperty {
        /// Property key (e.g. `maxAge`)
        key: String,
        /// Expected type: `string`, `int` or `bool`
        expected: &'static str,
        /// Rendered offending value
        value: String,
    },
    /// A route declaration (`x-cors` / `x-cors-preflight`) is malformed
    InvalidDeclaration {
        /// Where the declaration was found (`GET /pets` or `/pets`)
        location: String,
        /// Parser message
        message: String,
    },
    /// `allowCredentials` was still unset after falling back to the defaults
    ///
    /// Defaults always carry a concrete boolean, so this indicates a bug in
    /// how the defaults were constructed.
    UnresolvedCredentials,
}

impl fmt::Display for CorsConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsConfigError::InvalidProperty {
                key,
                expected,
                value,
            } => {
                write!(
                    f,
                    "CORS configuration error: could not parse property '{}' value {} as {}",
                    key, value, expected
                )
            }
            CorsConfigError::InvalidDeclaration { location, message } => {
                write!(
                    f,
                    "CORS configuration error: invalid declaration on {}: {}",
                    location, message
                )
            }
            CorsConfigError::UnresolvedCredentials => {
                write!(
                    f,
                    "CORS configuration error: allowCredentials still unset \
                    after applying global defaults"
                )
            }
        }
    }
}

impl std::error::Error for CorsConfigError {}
