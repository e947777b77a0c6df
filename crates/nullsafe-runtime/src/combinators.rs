//! Explicit combinators over optional values.
//!
//! These are the escape hatches for code that wants to handle `nil` without
//! the `?.` sugar. They work on any `Option<T>` and need no scope activation.

use crate::failure::{CallSite, NullPointerFailure};
use std::panic::Location;

/// Returns the payload, or `default` when absent. Never fails.
///
/// ```
/// assert_eq!(nullsafe_runtime::or(Some(1), 5), 1);
/// assert_eq!(nullsafe_runtime::or(None, 5), 5);
/// ```
pub fn or<T>(value: Option<T>, default: T) -> T {
    value.unwrap_or(default)
}

/// Like [`or`], but only computes the default when it is needed.
///
/// ```
/// assert_eq!(nullsafe_runtime::or_get(None, || "fallback".len()), 8);
/// ```
pub fn or_get<T>(value: Option<T>, default: impl FnOnce() -> T) -> T {
    value.unwrap_or_else(default)
}

/// Asserts the value is present.
///
/// Returns the payload, or a [`NullPointerFailure`] naming the caller's
/// location. Use it where absence is a bug that should surface loudly.
///
/// ```
/// use nullsafe_runtime::sure;
///
/// assert_eq!(sure(Some("x")), Ok("x"));
/// assert!(sure::<&str>(None).is_err());
/// ```
#[track_caller]
pub fn sure<T>(value: Option<T>) -> Result<T, NullPointerFailure> {
    match value {
        Some(value) => Ok(value),
        None => Err(NullPointerFailure::new(CallSite::from(Location::caller()))),
    }
}

/// Re-types the value as present without checking.
///
/// Unlike [`sure`], there is no runtime check at all.
///
/// # Safety
///
/// `value` must be `Some`. Calling this on `None` is undefined behavior.
///
/// ```
/// let n = unsafe { nullsafe_runtime::unchecked(Some(4)) };
/// assert_eq!(n, 4);
/// ```
pub unsafe fn unchecked<T>(value: Option<T>) -> T {
    // SAFETY: the caller guarantees `value` is `Some`.
    unsafe { value.unwrap_unchecked() }
}

/// Maps the payload through `callback`; absent stays absent.
///
/// `callback` is never invoked on an absent value.
///
/// ```
/// assert_eq!(nullsafe_runtime::let_(Some(2), |n| n * 10), Some(20));
/// assert_eq!(nullsafe_runtime::let_(None::<i32>, |n| n * 10), None);
/// ```
pub fn let_<T, U>(value: Option<T>, callback: impl FnOnce(T) -> U) -> Option<U> {
    value.map(callback)
}

/// Invokes `callback` on the payload for its side effect, if present.
///
/// ```
/// let mut seen = Vec::new();
/// nullsafe_runtime::run(Some(1), |n| seen.push(n));
/// nullsafe_runtime::run(None, |n| seen.push(n));
/// assert_eq!(seen, vec![1]);
/// ```
pub fn run<T>(value: Option<T>, callback: impl FnOnce(T)) {
    if let Some(payload) = value {
        callback(payload);
    }
}

/// Like [`run`] on a borrowed payload, then returns `value` unchanged.
///
/// ```
/// let mut total = 0;
/// let v = nullsafe_runtime::apply(Some(3), |n| total += n);
/// assert_eq!((v, total), (Some(3), 3));
/// ```
pub fn apply<T>(value: Option<T>, callback: impl FnOnce(&T)) -> Option<T> {
    if let Some(payload) = &value {
        callback(payload);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_or_never_fails() {
        for x in [-1, 0, 7] {
            assert_eq!(or(Some(x), 42), x);
        }
        assert_eq!(or(None, 42), 42);
        assert_eq!(or(Some(None::<i32>), Some(1)), None);
    }

    #[test]
    fn test_or_get_is_lazy() {
        let calls = Cell::new(0);
        let value = or_get(Some(1), || {
            calls.set(calls.get() + 1);
            2
        });
        assert_eq!(value, 1);
        assert_eq!(calls.get(), 0);
        assert_eq!(or_get(None, || 2), 2);
    }

    #[test]
    fn test_sure() {
        assert_eq!(sure(Some(String::from("x"))).unwrap(), "x");
        let failure = sure::<u8>(None).unwrap_err();
        assert!(failure.call_site.file.unwrap().ends_with("combinators.rs"));
    }

    #[test]
    fn test_let_never_calls_on_absent() {
        let calls = Cell::new(0);
        let result = let_(None::<i32>, |n| {
            calls.set(calls.get() + 1);
            n + 1
        });
        assert_eq!(result, None);
        assert_eq!(calls.get(), 0);
        assert_eq!(let_(Some("abc"), str::len), Some(3));
    }

    #[test]
    fn test_run_only_on_present() {
        let calls = Cell::new(0);
        run(Some(5), |n| calls.set(calls.get() + n));
        run(None, |n: usize| calls.set(calls.get() + n));
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn test_apply_returns_value_unchanged() {
        let calls = Cell::new(0);
        let present = apply(Some(vec![1, 2]), |v| calls.set(calls.get() + v.len()));
        assert_eq!(present, Some(vec![1, 2]));
        assert_eq!(calls.get(), 2);

        let absent = apply(None::<Vec<i32>>, |_| calls.set(100));
        assert_eq!(absent, None);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_unchecked_on_present() {
        // SAFETY: the value is present.
        let s = unsafe { unchecked(Some("ok")) };
        assert_eq!(s, "ok");
    }
}
