//! Error macros for compact-guard

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::GuardError::invalid_value($context, $value))
    };
}

/// Macro for mapping store write errors
#[macro_export]
macro_rules! map_write_err {
    ($path:expr, $error:expr) => {
        $crate::error::GuardError::write_failure($path, $error)
    };
}
