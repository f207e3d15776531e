//! Utilities.

/// Returns ceiling log2.
pub const fn clog2(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        (::std::mem::size_of::<usize>() * 8) - (value - 1).leading_zeros() as usize
    }
}

/// Return aligned value of `value` by `by`
///
/// ### Example
/// ```
/// # use shellflow::align_usize;
/// let value = 15;
/// let byte_aligned = align_usize(value, 8);
/// assert_eq!(byte_aligned, 16);
/// ```
pub const fn align_usize(value: usize, by: usize) -> usize { (value + by - 1) / by * by }

/// Returns the number of `by`-sized units needed to hold `value`.
pub const fn units_of(value: usize, by: usize) -> usize { align_usize(value, by) / by }

/// Ok or executing the given expression.
#[macro_export]
macro_rules! ok_or {
    ($e:expr, $err:expr) => {{
        match $e {
            Ok(r) => r,
            Err(_) => $err,
        }
    }};
}

/// Some or executing the given expression.
#[macro_export]
macro_rules! some_or {
    ($e:expr, $err:expr) => {{
        match $e {
            Some(r) => r,
            None => $err,
        }
    }};
}
