//! Non-panicking assertions.
//!
//! A failed check returns [`E2eError::AssertionFailed`](crate::E2eError) from
//! the enclosing scenario so the runner can record it and move on.

/// Fail the scenario unless `cond` holds.
#[macro_export]
macro_rules! check {
    ($cond:expr, $($msg:tt)+) => {
        if !$cond {
            return Err($crate::E2eError::AssertionFailed(format!($($msg)+)));
        }
    };
}

/// Fail the scenario unless `left == right`.
#[macro_export]
macro_rules! check_eq {
    ($left:expr, $right:expr, $($msg:tt)+) => {
        match (&$left, &$right) {
            (left, right) => {
                if left != right {
                    return Err($crate::E2eError::AssertionFailed(format!(
                        "{}: expected {:?}, got {:?}",
                        format!($($msg)+),
                        right,
                        left
                    )));
                }
            }
        }
    };
}
